//! System clipboard access for `get --copy`

use arboard::Clipboard;

use crate::error::VaultResult;

/// Put `text` on the system clipboard
///
/// On X11 and Wayland the contents are served by this process, so they
/// survive its exit only when a clipboard manager takes them over.
pub fn copy_to_clipboard(text: &str) -> VaultResult<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    tracing::debug!("copied password to clipboard");
    Ok(())
}
