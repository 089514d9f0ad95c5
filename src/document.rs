//! The viewer document: an opened PDF plus a current-page cursor.

use std::io::Read;
use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;
use tiny_skia::{Pixmap, PixmapMut};

use crate::backend::{LopdfBackend, PdfBackend};
use crate::detect::{detect_header, detect_header_from_path};
use crate::error::{Error, Result};
use crate::geometry::{Point, Size};
use crate::model::{Metadata, Page};
use crate::notify::{DocumentId, PageChanged, PageNotifier, SubscriptionId};
use crate::options::{OpenOptions, RenderOptions};
use crate::render::{check_scale, PageRenderer, MAX_PIXELS};

/// State that exists only while a document is loaded.
struct Loaded {
    backend: Box<dyn PdfBackend>,
    renderer: Box<dyn PageRenderer>,
    /// `None` only for documents without pages.
    page: Option<Page>,
    path: Option<PathBuf>,
}

/// A PDF document as seen by a viewer window.
///
/// A `Document` starts out empty. Reading a file parses it through a
/// [`PdfBackend`], obtains the backend's [`PageRenderer`] and selects an
/// initial page. From then on the current page index always satisfies
/// `index < page_count()`, and every change of it is announced to
/// subscribers as a [`PageChanged`] event.
///
/// # Example
///
/// ```no_run
/// use vindaloo::Document;
///
/// let mut doc = Document::open("manual.pdf")?;
/// println!("{} pages", doc.page_count());
///
/// let changes = doc.watch();
/// while doc.next_page() {}
/// assert_eq!(changes.len() as u32, doc.page_count() - 1);
/// # Ok::<(), vindaloo::Error>(())
/// ```
pub struct Document {
    id: DocumentId,
    loaded: Option<Loaded>,
    notifier: PageNotifier,
    render_options: RenderOptions,
}

impl Document {
    /// Create an empty document with nothing loaded.
    pub fn new() -> Self {
        Self {
            id: DocumentId::next(),
            loaded: None,
            notifier: PageNotifier::new(),
            render_options: RenderOptions::default(),
        }
    }

    /// Open the PDF file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, &OpenOptions::default())
    }

    /// Open the PDF file at `path` with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &OpenOptions) -> Result<Self> {
        let mut doc = Self::new();
        doc.read_from_path(path, options)?;
        Ok(doc)
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut doc = Self::new();
        doc.read_from_bytes(data, &OpenOptions::default())?;
        Ok(doc)
    }

    /// Wrap an already opened backend.
    pub fn from_backend(backend: Box<dyn PdfBackend>) -> Result<Self> {
        let mut doc = Self::new();
        doc.load(backend, None, &OpenOptions::default())?;
        Ok(doc)
    }

    /// Replace the contents of this document with the file at `path`.
    pub fn read_from_path<P: AsRef<Path>>(&mut self, path: P, options: &OpenOptions) -> Result<()> {
        let path = path.as_ref();
        if options.check_header {
            detect_header_from_path(path)?;
        }
        let backend = LopdfBackend::load_file(path)?;
        self.load(Box::new(backend), Some(path.to_path_buf()), options)
    }

    /// Replace the contents of this document with PDF bytes.
    pub fn read_from_bytes(&mut self, data: &[u8], options: &OpenOptions) -> Result<()> {
        if options.check_header {
            detect_header(data)?;
        }
        let backend = LopdfBackend::load_bytes(data)?;
        self.load(Box::new(backend), None, options)
    }

    /// Replace the contents of this document with PDF data read from `reader`.
    pub fn read_from_reader<R: Read>(&mut self, mut reader: R, options: &OpenOptions) -> Result<()> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.read_from_bytes(&data, options)
    }

    /// Install `backend` as the loaded document and select the initial page.
    ///
    /// Announces a page change if the document has at least one page.
    pub fn load(
        &mut self,
        backend: Box<dyn PdfBackend>,
        path: Option<PathBuf>,
        options: &OpenOptions,
    ) -> Result<()> {
        let count = backend.page_count();
        let page = match count {
            0 => None,
            _ => Some(backend.page(options.initial_page.min(count - 1))?),
        };
        let renderer = backend.renderer(&self.render_options);

        log::debug!(
            "document {}: loaded {} pages (PDF {}) from {}",
            self.id.get(),
            count,
            backend.version(),
            path.as_deref()
                .map_or_else(|| "memory".to_string(), |p| p.display().to_string())
        );

        let announce = page.is_some();
        self.loaded = Some(Loaded {
            backend,
            renderer,
            page,
            path,
        });
        if announce {
            self.announce();
        }
        Ok(())
    }

    /// Release the loaded document, returning to the empty state.
    ///
    /// Subscriptions survive and will hear about the next document.
    pub fn close(&mut self) {
        if self.loaded.take().is_some() {
            log::debug!("document {}: closed", self.id.get());
        }
    }

    /// Identifier carried by this document's notifications.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Path the document was read from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.loaded.as_ref()?.path.as_deref()
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or(Error::NoDocument)
    }

    /// The underlying parsed PDF.
    pub fn pdf_document(&self) -> Result<&dyn PdfBackend> {
        Ok(self.loaded()?.backend.as_ref())
    }

    /// Total number of pages; zero when nothing is loaded.
    pub fn page_count(&self) -> u32 {
        self.loaded
            .as_ref()
            .map_or(0, |loaded| loaded.backend.page_count())
    }

    /// Document information dictionary.
    pub fn metadata(&self) -> Result<Metadata> {
        Ok(self.loaded()?.backend.metadata())
    }

    /// Index of the current page, if one is selected.
    pub fn page_index(&self) -> Option<u32> {
        self.loaded.as_ref()?.page.as_ref().map(|page| page.index)
    }

    /// The current page.
    pub fn page(&self) -> Result<&Page> {
        self.loaded()?.page.as_ref().ok_or(Error::NoPage)
    }

    /// Displayed size of the current page in points.
    pub fn page_size(&self) -> Result<Size> {
        Ok(self.page()?.size())
    }

    /// Make page `index` current.
    ///
    /// An index outside `0..page_count()` is rejected with
    /// [`Error::PageOutOfRange`] and leaves the current page untouched.
    /// Selecting the page that is already current succeeds without a
    /// notification.
    pub fn set_page_by_index(&mut self, index: u32) -> Result<()> {
        let loaded = self.loaded.as_mut().ok_or(Error::NoDocument)?;
        let count = loaded.backend.page_count();
        if index >= count {
            return Err(Error::PageOutOfRange(index, count));
        }
        if loaded.page.as_ref().map(|p| p.index) == Some(index) {
            return Ok(());
        }

        loaded.page = Some(loaded.backend.page(index)?);
        log::debug!("document {}: page {}/{}", self.id.get(), index + 1, count);
        self.announce();
        Ok(())
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index()
            .is_some_and(|index| index + 1 < self.page_count())
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index().is_some_and(|index| index > 0)
    }

    /// Advance to the following page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        match self.page_index() {
            Some(index) if self.has_next_page() => self.step_to(index + 1),
            _ => false,
        }
    }

    /// Go back to the preceding page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        match self.page_index() {
            Some(index) if index > 0 => self.step_to(index - 1),
            _ => false,
        }
    }

    /// Jump to the first page. Returns `false` if it is already current.
    pub fn first_page(&mut self) -> bool {
        match self.page_index() {
            Some(index) if index > 0 => self.step_to(0),
            _ => false,
        }
    }

    /// Jump to the last page. Returns `false` if it is already current.
    pub fn last_page(&mut self) -> bool {
        let last = self.page_count().saturating_sub(1);
        match self.page_index() {
            Some(index) if index < last => self.step_to(last),
            _ => false,
        }
    }

    fn step_to(&mut self, index: u32) -> bool {
        match self.set_page_by_index(index) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("document {}: cannot open page {}: {}", self.id.get(), index, e);
                false
            }
        }
    }

    /// Paint the current page into `target`, top-left corner at `at`,
    /// `scale` device pixels per point.
    pub fn draw_page_at_point(
        &self,
        at: Point,
        scale: f32,
        target: &mut PixmapMut<'_>,
    ) -> Result<()> {
        check_scale(scale)?;
        let loaded = self.loaded()?;
        let page = loaded.page.as_ref().ok_or(Error::NoPage)?;
        loaded.renderer.draw_page(page, at, scale, target)
    }

    /// Rasterize the current page into a new pixmap sized to fit it.
    ///
    /// Fails with [`Error::Render`] when the pixmap would exceed
    /// [`MAX_PIXELS`].
    pub fn render_page(&self, scale: f32) -> Result<Pixmap> {
        check_scale(scale)?;
        let (width, height) = self.page_size()?.to_pixels(scale);
        let pixels = u64::from(width)
            .checked_mul(u64::from(height))
            .filter(|&pixels| pixels <= MAX_PIXELS)
            .ok_or_else(|| {
                Error::Render(format!(
                    "{}x{} pixmap exceeds the {} pixel limit",
                    width, height, MAX_PIXELS
                ))
            })?;
        log::trace!("allocating {} pixels for page render", pixels);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::Render(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        self.draw_page_at_point(Point::ORIGIN, scale, &mut pixmap.as_mut())?;
        Ok(pixmap)
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Change how pages are drawn. Takes effect immediately if a document
    /// is loaded.
    pub fn set_render_options(&mut self, options: RenderOptions) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.renderer = loaded.backend.renderer(&options);
        }
        self.render_options = options;
    }

    /// Call `callback` after every page change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&PageChanged) + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Receive page changes over a channel.
    pub fn watch(&mut self) -> Receiver<PageChanged> {
        self.notifier.watch()
    }

    fn announce(&mut self) {
        self.notifier.notify(PageChanged { sender: self.id });
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("path", &self.path())
            .field("page_count", &self.page_count())
            .field("page_index", &self.page_index())
            .field("notifier", &self.notifier)
            .finish()
    }
}
