//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuExternalLink as ExternalLink, LuFileText as FileText, LuFolder as Folder,
        LuGlobe as Network,
    };
}

mod bootstrap {
    pub use icondata::{
        BsBoxArrowUpRight as ExternalLink, BsFileEarmarkText as FileText,
        BsFolderFill as Folder, BsGlobe as Network,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(FOLDER, Folder);
themed_icon!(FILE_TEXT, FileText);
themed_icon!(EXTERNAL_LINK, ExternalLink);
themed_icon!(NETWORK, Network);
