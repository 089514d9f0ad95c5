//! Options for opening and drawing documents.

/// Options for opening a PDF document.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    /// Page selected once the document is loaded (clamped to the last page)
    pub initial_page: u32,

    /// Verify the `%PDF-` header before handing data to the backend
    pub check_header: bool,
}

impl OpenOptions {
    /// Create new open options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `index` after loading instead of the first page.
    pub fn with_initial_page(mut self, index: u32) -> Self {
        self.initial_page = index;
        self
    }

    /// Enable or disable header verification.
    pub fn with_header_check(mut self, check: bool) -> Self {
        self.check_header = check;
        self
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            initial_page: 0,
            check_header: true,
        }
    }
}

/// Options consumed by page renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// RGBA fill painted under the page content; `None` leaves the target untouched
    pub background: Option<[u8; 4]>,

    /// Anti-alias path edges
    pub anti_alias: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page background color.
    pub fn with_background(mut self, rgba: [u8; 4]) -> Self {
        self.background = Some(rgba);
        self
    }

    /// Draw page content straight onto the target.
    pub fn transparent(mut self) -> Self {
        self.background = None;
        self
    }

    /// Enable or disable anti-aliasing.
    pub fn with_anti_alias(mut self, enabled: bool) -> Self {
        self.anti_alias = enabled;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: Some([255, 255, 255, 255]),
            anti_alias: true,
        }
    }
}
