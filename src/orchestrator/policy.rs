use crate::error::Result;
use crate::host::{HostClient, PackageKind};

/// Scoped force-enable of the automatic-update policy for one kind.
///
/// The flag is process-wide on the host, so it must never outlive the
/// handler call that needed it. Acquiring the guard records the prior
/// value; dropping it writes that value back, on every exit path.
pub struct PolicyGuard<'a> {
    host: &'a dyn HostClient,
    kind: PackageKind,
    previous: bool,
}

impl<'a> PolicyGuard<'a> {
    pub fn enable(host: &'a dyn HostClient, kind: PackageKind) -> Result<Self> {
        let previous = host.set_auto_update_policy(kind, true)?;
        Ok(Self {
            host,
            kind,
            previous,
        })
    }
}

impl Drop for PolicyGuard<'_> {
    fn drop(&mut self) {
        // Restoration failure cannot be surfaced from drop; log it instead
        // of leaving the caller with a half-restored flag silently.
        if let Err(e) = self.host.set_auto_update_policy(self.kind, self.previous) {
            eprintln!(
                "warning: failed to restore auto-update policy for {}: {}",
                self.kind.as_str(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::MockHost;

    #[test]
    fn restores_disabled_policy_on_drop() {
        let host = MockHost::new().with_policy(PackageKind::Plugin, false);

        {
            let _guard = PolicyGuard::enable(&host, PackageKind::Plugin).unwrap();
            assert_eq!(host.policy(PackageKind::Plugin), Some(true));
        }

        assert_eq!(host.policy(PackageKind::Plugin), Some(false));
    }

    #[test]
    fn restores_enabled_policy_on_drop() {
        let host = MockHost::new().with_policy(PackageKind::Theme, true);

        {
            let _guard = PolicyGuard::enable(&host, PackageKind::Theme).unwrap();
        }

        assert_eq!(host.policy(PackageKind::Theme), Some(true));
    }

    #[test]
    fn restores_on_panic_path() {
        let host = MockHost::new().with_policy(PackageKind::Plugin, false);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = PolicyGuard::enable(&host, PackageKind::Plugin).unwrap();
            panic!("mid-call fault");
        }));

        assert!(result.is_err());
        assert_eq!(host.policy(PackageKind::Plugin), Some(false));
    }
}
