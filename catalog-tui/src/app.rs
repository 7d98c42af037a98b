//! Catalog screen state and event handling.

use std::io;

use catalog_lib::PaginationController;
use catalog_lib::api::ProductSource;
use catalog_lib::error::ObserverError;
use catalog_lib::view::Column;
use catalog_lib::view::EditOutcome;
use catalog_lib::view::ProductRow;
use catalog_lib::view::StatusView;
use catalog_lib::view::TitleEditor;
use catalog_lib::viewport::TriggerOptions;
use catalog_lib::viewport::ViewportTrigger;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use log::debug;
use log::info;
use log::warn;

use crate::render;
use crate::render::ColumnLayout;
use crate::terminal::TerminalGuard;
use crate::viewport::HostViewport;

/// Name of the load sentinel, the virtual row after the last product.
const SENTINEL: &str = "load-more";

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: usize = 3;

fn spawn_load_more<S: ProductSource + 'static>(controller: &PaginationController<S>) {
    let controller = controller.clone();
    tokio::spawn(async move {
        controller.load_more().await;
    });
}

fn spawn_refetch<S: ProductSource + 'static>(controller: &PaginationController<S>) {
    let controller = controller.clone();
    tokio::spawn(async move {
        controller.refetch().await;
    });
}

pub struct App<S> {
    controller: PaginationController<S>,
    trigger: ViewportTrigger<HostViewport>,
    options: TriggerOptions,
    /// Record count the sentinel was mounted after.
    sentinel_at: Option<usize>,
    editor: TitleEditor,
    status: StatusView,
    selected: usize,
    scroll: usize,
    body_height: usize,
    width: u16,
    manual_load: bool,
    quit: bool,
}

impl<S: ProductSource + 'static> App<S> {
    pub fn new(
        controller: PaginationController<S>,
        viewport: HostViewport,
        options: TriggerOptions,
    ) -> Self {
        let status = controller.with_state(StatusView::from_state);
        Self {
            controller,
            trigger: ViewportTrigger::new(viewport),
            options,
            sentinel_at: None,
            editor: TitleEditor::new(),
            status,
            selected: 0,
            scroll: 0,
            body_height: 1,
            width: 80,
            manual_load: false,
            quit: false,
        }
    }

    pub fn status(&self) -> &StatusView {
        &self.status
    }

    pub fn editor(&self) -> &TitleEditor {
        &self.editor
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn manual_load(&self) -> bool {
        self.manual_load
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Visible products with their indices.
    pub fn visible_rows(&self, height: usize) -> Vec<(usize, ProductRow)> {
        self.controller.with_state(|state| {
            state
                .records()
                .iter()
                .enumerate()
                .skip(self.scroll)
                .take(height)
                .map(|(index, product)| (index, ProductRow::from(product)))
                .collect()
        })
    }

    /// Brings the screen state in line with the controller before a frame.
    ///
    /// Mounts or unmounts the sentinel and reports the table layout to the
    /// viewport, which may start the next fetch.
    pub fn sync(&mut self, width: u16, body_height: usize) {
        self.width = width;
        self.body_height = body_height;
        self.status = self.controller.with_state(StatusView::from_state);
        self.clamp();

        if self.status.show_sentinel && !self.manual_load {
            // A page landed between frames; remount so the sentinel starts
            // hidden at its new row.
            if self.sentinel_at != Some(self.status.loaded) {
                self.unmount_sentinel();
            }
            self.mount_sentinel();
        } else {
            self.unmount_sentinel();
        }

        let sentinel_row = self.status.loaded;
        let mounted = self.trigger.is_attached();
        self.trigger.observer().update(self.scroll, body_height, |target| {
            (mounted && target == SENTINEL).then_some(sentinel_row)
        });
    }

    fn mount_sentinel(&mut self) {
        // Fresh closure every frame; the trigger keeps its subscription.
        let controller = self.controller.clone();
        let loaded = self.status.loaded;
        let on_visible = move || {
            debug!("sentinel visible after {} rows", loaded);
            spawn_load_more(&controller);
        };

        if self.trigger.is_attached() {
            self.trigger.set_callback(on_visible);
            return;
        }

        match self.trigger.attach(&SENTINEL.to_string(), on_visible, self.options) {
            Ok(()) => self.sentinel_at = Some(loaded),
            Err(ObserverError::Unavailable) => {
                warn!("scroll-triggered loading unavailable, falling back to manual loading");
                self.manual_load = true;
            }
            Err(err) => warn!("could not mount sentinel: {}", err),
        }
    }

    fn unmount_sentinel(&mut self) {
        self.trigger.detach();
        self.sentinel_at = None;
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        if self.editor.is_editing() {
            self.handle_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_by(1),
            KeyCode::PageUp => self.move_by(-(self.body_height as isize)),
            KeyCode::PageDown => self.move_by(self.body_height as isize),
            KeyCode::Home | KeyCode::Char('g') => self.move_to(0),
            KeyCode::End | KeyCode::Char('G') => self.move_to(self.status.loaded.saturating_sub(1)),
            KeyCode::Enter | KeyCode::Char(' ') => self.begin_edit(),
            KeyCode::Char('r') => {
                info!("refetch requested");
                spawn_refetch(&self.controller);
            }
            KeyCode::Char('m') => spawn_load_more(&self.controller),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.commit_edit(),
            KeyCode::Esc => {
                self.editor.cancel();
            }
            KeyCode::Up => {
                self.commit_edit();
                self.move_by(-1);
            }
            KeyCode::Down | KeyCode::Tab => {
                self.commit_edit();
                self.move_by(1);
            }
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            KeyCode::Char(ch) => self.editor.insert(ch),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_STEP as isize),
            MouseEventKind::ScrollUp => self.scroll_by(-(WHEEL_STEP as isize)),
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn click(&mut self, x: u16, y: u16) {
        let Some(offset) = y.checked_sub(render::BODY_TOP) else {
            self.commit_edit();
            return;
        };
        let index = self.scroll + offset as usize;
        if offset as usize >= self.body_height || index >= self.status.loaded {
            self.commit_edit();
            return;
        }

        let on_title = ColumnLayout::new(self.width).column_at(x) == Some(Column::Title);
        if self.editor.is_editing() && index == self.selected && on_title {
            return;
        }
        self.commit_edit();
        self.selected = index;
        if on_title {
            self.begin_edit();
        }
    }

    fn begin_edit(&mut self) {
        let current = self.controller.with_state(|state| {
            state
                .records()
                .get(self.selected)
                .map(|product| (product.id, product.title.clone()))
        });
        if let Some((id, title)) = current {
            self.editor.begin(id, &title);
        }
    }

    /// Ends an open edit, applying it if it is a real change. Also used
    /// when focus leaves the cell.
    fn commit_edit(&mut self) {
        let Some(id) = self.editor.editing_id() else {
            return;
        };
        let current = self
            .controller
            .with_state(|state| state.get(id).map(|product| product.title.clone()));
        let Some(current) = current else {
            debug!("product {} no longer loaded, dropping edit", id);
            self.editor.cancel();
            return;
        };
        if let EditOutcome::Commit { id, title } = self.editor.commit(&current) {
            self.controller.update_title(id, title);
        }
    }

    fn move_by(&mut self, delta: isize) {
        let target = self.selected.saturating_add_signed(delta);
        self.move_to(target);
    }

    fn move_to(&mut self, index: usize) {
        let last = self.status.loaded.saturating_sub(1);
        self.selected = index.min(last);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.body_height {
            self.scroll = self.selected + 1 - self.body_height;
        }
    }

    /// Scrolls the table without moving past the sentinel row.
    fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        let bottom = self.scroll + self.body_height;
        if self.selected < self.scroll || self.selected >= bottom {
            let selected = self.selected.clamp(self.scroll, bottom.saturating_sub(1));
            self.commit_edit();
            self.selected = selected.min(self.status.loaded.saturating_sub(1));
        }
    }

    fn max_scroll(&self) -> usize {
        (self.status.loaded + 1).saturating_sub(self.body_height)
    }

    /// Keeps selection and scroll valid after the record count changed,
    /// e.g. after a refetch returned fewer rows.
    fn clamp(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
        let last = self.status.loaded.saturating_sub(1);
        if self.selected > last {
            self.commit_edit();
            self.selected = last;
        }
    }
}

/// Runs the event loop until the user quits.
pub async fn run<S: ProductSource + 'static>(
    mut app: App<S>,
    terminal: &mut TerminalGuard,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let controller = app.controller.clone();

    loop {
        let (width, height) = terminal.size()?;
        app.sync(width, render::body_height(height));
        render::draw(terminal.stdout(), &app, width, height)?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => app.handle_event(event),
                Some(Err(err)) => return Err(err),
                None => break,
            },
            _ = controller.changed() => {}
        }

        if app.should_quit() {
            break;
        }
    }

    app.unmount_sentinel();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::ops::Range;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use async_trait::async_trait;
    use catalog_lib::PaginationState;
    use catalog_lib::api::Page;
    use catalog_lib::error::FetchError;
    use catalog_lib::model::Product;
    use catalog_lib::viewport::RowViewport;

    use super::*;

    /// In-memory catalog counting its fetches.
    struct Shelf {
        products: Mutex<Vec<Product>>,
        fetches: AtomicUsize,
    }

    impl Shelf {
        fn with_ids(ids: Range<u64>) -> Arc<Self> {
            Arc::new(Self {
                products: Mutex::new(products(ids)),
                fetches: AtomicUsize::new(0),
            })
        }

        fn replace(&self, ids: Range<u64>) {
            *self.products.lock().unwrap() = products(ids);
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        fn answer(&self, offset: usize, page_size: NonZeroUsize) -> Page {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let products = self.products.lock().unwrap();
            let records = products
                .iter()
                .skip(offset)
                .take(page_size.get())
                .cloned()
                .collect();
            Page::new(records, products.len())
        }
    }

    #[async_trait]
    impl ProductSource for Shelf {
        async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
            Ok(self.answer(offset, page_size))
        }
    }

    fn products(ids: Range<u64>) -> Vec<Product> {
        ids.map(|id| Product::new(id, format!("Product {}", id), 1.0))
            .collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn mounted(shelf: &Arc<Shelf>, viewport: HostViewport) -> App<Arc<Shelf>> {
        let controller = PaginationController::mount(shelf.clone(), size(10)).await;
        App::new(controller, viewport, TriggerOptions::default())
    }

    fn rows() -> HostViewport {
        HostViewport::Rows(RowViewport::new())
    }

    async fn settled(app: &App<Arc<Shelf>>, done: impl Fn(&PaginationState) -> bool) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !app.controller.with_state(&done) {
                app.controller.changed().await;
            }
        })
        .await
        .expect("controller did not settle");
    }

    fn title(app: &App<Arc<Shelf>>, id: u64) -> Option<String> {
        app.controller
            .with_state(|state| state.get(id).map(|p| p.title.clone()))
    }

    #[tokio::test]
    async fn test_sentinel_unmounted_while_loading_or_exhausted() {
        let shelf = Shelf::with_ids(0..5);
        let controller = PaginationController::new(shelf.clone(), size(10));
        let mut app = App::new(controller.clone(), rows(), TriggerOptions::default());

        app.sync(80, 20);
        assert!(!app.trigger.is_attached());

        controller.refetch().await;
        app.sync(80, 20);
        assert!(!app.trigger.is_attached());
        assert!(!app.manual_load());

        tokio::task::yield_now().await;
        assert_eq!(shelf.fetches(), 1);
    }

    #[tokio::test]
    async fn test_sentinel_fires_once_then_remounts() {
        let shelf = Shelf::with_ids(0..25);
        let mut app = mounted(&shelf, rows()).await;

        // Row 10 is on screen: one load, however many frames see it.
        app.sync(80, 20);
        assert!(app.trigger.is_attached());
        app.sync(80, 20);
        settled(&app, |state| state.len() == 20 && !state.is_loading()).await;
        assert_eq!(shelf.fetches(), 2);

        // Remounted after the page landed; row 20 is within the margin.
        app.sync(80, 20);
        settled(&app, |state| state.len() == 25 && !state.is_loading()).await;
        assert_eq!(shelf.fetches(), 3);

        app.sync(80, 20);
        assert!(!app.trigger.is_attached());
        assert_eq!(app.status().header(), "Displaying 25 of 25 products");
    }

    #[tokio::test]
    async fn test_sentinel_off_screen_does_not_load() {
        let shelf = Shelf::with_ids(0..25);
        let mut app = mounted(&shelf, rows()).await;

        app.sync(80, 5);
        assert!(app.trigger.is_attached());
        tokio::task::yield_now().await;
        assert_eq!(shelf.fetches(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_viewport_falls_back_to_manual() {
        let shelf = Shelf::with_ids(0..25);
        let mut app = mounted(&shelf, HostViewport::Unsupported).await;

        app.sync(80, 20);
        assert!(app.manual_load());
        assert!(!app.trigger.is_attached());
        tokio::task::yield_now().await;
        assert_eq!(shelf.fetches(), 1);

        app.handle_event(key(KeyCode::Char('m')));
        settled(&app, |state| state.len() == 20 && !state.is_loading()).await;
        assert_eq!(shelf.fetches(), 2);
    }

    #[tokio::test]
    async fn test_moving_selection_commits_edit() {
        let shelf = Shelf::with_ids(0..25);
        let mut app = mounted(&shelf, rows()).await;
        app.sync(80, 5);

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.editor().editing_id(), Some(0));
        app.handle_event(key(KeyCode::Char('!')));
        app.handle_event(key(KeyCode::Down));

        assert!(!app.editor().is_editing());
        assert_eq!(app.selected(), 1);
        assert_eq!(title(&app, 0).as_deref(), Some("Product 0!"));
    }

    #[tokio::test]
    async fn test_escape_discards_edit() {
        let shelf = Shelf::with_ids(0..25);
        let mut app = mounted(&shelf, rows()).await;
        app.sync(80, 5);

        app.handle_event(key(KeyCode::Enter));
        app.handle_event(key(KeyCode::Char('!')));
        app.handle_event(key(KeyCode::Esc));

        assert!(!app.editor().is_editing());
        assert_eq!(title(&app, 0).as_deref(), Some("Product 0"));
    }

    #[tokio::test]
    async fn test_shrinking_list_commits_open_edit() {
        let shelf = Shelf::with_ids(0..25);
        let mut app = mounted(&shelf, rows()).await;
        app.sync(80, 5);

        app.handle_event(key(KeyCode::End));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.editor().editing_id(), Some(9));
        app.handle_event(key(KeyCode::Char('!')));

        // Product 9 is now fifth of five.
        shelf.replace(5..10);
        app.controller.refetch().await;
        app.sync(80, 5);

        assert!(!app.editor().is_editing());
        assert_eq!(app.selected(), 4);
        assert_eq!(title(&app, 9).as_deref(), Some("Product 9!"));
    }
}
