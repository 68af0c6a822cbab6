//! Embedded DejaVu Sans, registered once as the `sans-serif` family so text
//! renders identically on hosts without system fonts.

use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

use crate::RenderError;

pub(crate) const FAMILY: &str = "sans-serif";

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static REGISTERED: OnceLock<bool> = OnceLock::new();

pub(crate) fn ensure_registered() -> Result<(), RenderError> {
    let registered = *REGISTERED.get_or_init(|| {
        let loaded = register_font(FAMILY, FontStyle::Normal, DEJAVU_SANS).is_ok();
        if !loaded {
            tracing::error!(family = FAMILY, "embedded font rejected");
        }
        loaded
    });

    if registered {
        Ok(())
    } else {
        Err(RenderError::Font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        assert!(ensure_registered().is_ok());
        assert!(ensure_registered().is_ok());
    }
}
