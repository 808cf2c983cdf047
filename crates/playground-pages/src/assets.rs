//! Static assets served next to the pages.
//!
//! Stylesheets, browser scripts and images are compiled into the binary so
//! the playground works from any working directory.

/// An embedded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    /// Path relative to the asset root, e.g. `css/playground.css`
    pub path: &'static str,

    /// File contents
    pub bytes: &'static [u8],
}

impl Asset {
    /// MIME type derived from the file extension.
    pub fn content_type(&self) -> String {
        mime_for(self.path)
    }
}

const ASSETS: &[Asset] = &[
    Asset {
        path: "css/playground.css",
        bytes: include_bytes!("../templates/css/playground.css"),
    },
    Asset {
        path: "js/landing.js",
        bytes: include_bytes!("../templates/js/landing.js"),
    },
    Asset {
        path: "js/demo.js",
        bytes: include_bytes!("../templates/js/demo.js"),
    },
    Asset {
        path: "assets/chevron.svg",
        bytes: include_bytes!("../templates/assets/chevron.svg"),
    },
    Asset {
        path: "favicon.png",
        bytes: include_bytes!("../templates/favicon.png"),
    },
];

/// Look up an asset by request path.
///
/// Leading slashes are ignored; anything that tries to leave the asset root
/// simply does not match.
pub fn get(path: &str) -> Option<Asset> {
    let path = path.trim_start_matches('/');
    ASSETS.iter().find(|asset| asset.path == path).copied()
}

/// Paths of all embedded assets.
pub fn paths() -> impl Iterator<Item = &'static str> {
    ASSETS.iter().map(|asset| asset.path)
}

/// MIME type for a path, defaulting to `application/octet-stream`.
pub fn mime_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
