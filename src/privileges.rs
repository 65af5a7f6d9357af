use crate::error::StartupError;

/// Switch to `user` once the socket is bound. Groups first, then the uid,
/// so the process can no longer regain root.
#[cfg(unix)]
pub fn drop_privileges(user: &str) -> Result<(), StartupError> {
    use nix::unistd::{self, User};

    let account = User::from_name(user)
        .map_err(|e| StartupError::Privileges(format!("looking up {user}: {e}")))?
        .ok_or_else(|| StartupError::Privileges(format!("no such user {user}")))?;

    #[cfg(not(any(target_os = "macos", target_os = "ios")))]
    unistd::setgroups(&[account.gid])
        .map_err(|e| StartupError::Privileges(format!("setgroups: {e}")))?;
    unistd::setgid(account.gid).map_err(|e| StartupError::Privileges(format!("setgid: {e}")))?;
    unistd::setuid(account.uid).map_err(|e| StartupError::Privileges(format!("setuid: {e}")))?;

    Ok(())
}

#[cfg(not(unix))]
pub fn drop_privileges(user: &str) -> Result<(), StartupError> {
    Err(StartupError::Privileges(format!(
        "switching to {user} is not supported on this platform"
    )))
}
