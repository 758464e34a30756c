#![allow(clippy::doc_markdown, dead_code)] // Generated constants are not all used

use std::sync::LazyLock;

include!(concat!(env!("OUT_DIR"), "/built.rs"));

/// Package version, suffixed with the short git commit and `-dirty` when built from a
/// modified checkout, e.g. `0.1.0-1a2b3c4-dirty`.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let mut version = PKG_VERSION.to_string();
    if let Some(commit) = GIT_COMMIT_HASH_SHORT {
        version.push('-');
        version.push_str(commit);
    }
    if GIT_DIRTY == Some(true) {
        version.push_str("-dirty");
    }
    version
});
