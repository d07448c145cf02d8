use super::context::{UpdateContext, UpdateScope};
use crate::error::UpdateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerAction {
    /// Take the new version now.
    Refresh,
    Dismiss,
}

/// Presentation contract for the "new version available" banner.
#[derive(Debug, Clone)]
pub struct Banner {
    context: UpdateContext,
}

impl Banner {
    pub const ROLE: &'static str = "alert";
    pub const ARIA_LIVE: &'static str = "assertive";
    pub const ACTIONS: [BannerAction; 2] = [BannerAction::Refresh, BannerAction::Dismiss];

    pub fn new(context: UpdateContext) -> Self {
        Self { context }
    }

    pub fn from_scope(scope: &UpdateScope) -> Result<Self, UpdateError> {
        scope.use_update().map(Self::new)
    }

    pub fn is_visible(&self) -> bool {
        self.context.snapshot().banner_visible()
    }

    pub fn dispatch(&self, action: BannerAction) {
        match action {
            BannerAction::Refresh => self.context.apply_update(),
            BannerAction::Dismiss => self.context.dismiss_banner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{UpdateProvider, UpdateStore};

    #[test]
    fn test_banner_requires_provider() {
        assert!(matches!(
            Banner::from_scope(&UpdateScope::unmounted()),
            Err(UpdateError::ProviderMissing)
        ));
    }

    #[test]
    fn test_dismiss_hides_banner() {
        let provider = UpdateProvider::mount(UpdateStore::new());
        let banner = Banner::from_scope(&UpdateScope::with_provider(&provider)).unwrap();
        assert!(!banner.is_visible());

        provider.context().set_update_available(true);
        assert!(banner.is_visible());

        banner.dispatch(BannerAction::Dismiss);
        assert!(!banner.is_visible());
    }
}
