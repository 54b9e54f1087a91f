use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length, Size, Task, Theme};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photo_picker::config::PickerConfig;
use photo_picker::error::{PickerError, Result};
use photo_picker::media::cache::ImageCache;
use photo_picker::state::item::{DisplayItem, Picture};
use photo_picker::state::library::{ImportSummary, MediaLibrary};
use photo_picker::ui::cell::ThumbnailTicket;
use photo_picker::ui::CellPool;

/// Space between cells, both directions
const GRID_SPACING: f32 = 2.0;

/// Longest edge kept for images picked through the camera tile
const CAPTURE_MAX_EDGE: u32 = 2048;

/// Main application state
struct PhotoPicker {
    config: PickerConfig,
    library_path: PathBuf,
    /// Shared by every cell's thumbnail requests
    cache: ImageCache,
    /// Library items in grid order, without the camera tile and captures
    library_items: Vec<DisplayItem>,
    /// Images picked through the camera tile, newest first
    captures: Vec<Picture>,
    /// Camera tile, captures, then library items
    items: Vec<DisplayItem>,
    /// The recycled cells; one page of the grid
    pool: CellPool,
    selected: HashSet<String>,
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    CellPressed(usize),
    ThumbnailDelivered {
        slot: usize,
        ticket: ThumbnailTicket,
        picture: Option<Picture>,
    },
    CaptureLoaded(Option<Picture>),
    ImportFolder,
    ImportComplete(std::result::Result<ImportSummary, String>),
    LibraryLoaded(std::result::Result<Vec<DisplayItem>, String>),
    NextPage,
    PreviousPage,
}

impl PhotoPicker {
    /// Load config, open the library and the thumbnail cache
    fn boot() -> Result<Self> {
        let config = PickerConfig::load()?;
        let library_path = match &config.library_path {
            Some(path) => path.clone(),
            None => MediaLibrary::default_path()?,
        };

        let library = MediaLibrary::open(&library_path)?;
        library.verify_files()?;
        let library_items = library.display_items()?;
        tracing::info!("Photo picker initialized with {} items", library_items.len());

        let cache = ImageCache::with_default_dir(config.memory_cache_capacity, config.disk_cache_max_bytes)?;
        let pool = CellPool::new(config.page_size, Size::new(config.cell_size, config.cell_size));
        let status = format!("Ready. {} items in library.", library_items.len());

        let mut picker = PhotoPicker {
            config,
            library_path,
            cache,
            library_items,
            captures: Vec::new(),
            items: Vec::new(),
            pool,
            selected: HashSet::new(),
            status,
        };
        picker.rebuild_items();
        Ok(picker)
    }

    /// First binding of the cell pool
    fn start(mut self) -> (Self, Task<Message>) {
        let task = self.bind_page();
        (self, task)
    }

    fn rebuild_items(&mut self) {
        self.items = std::iter::once(DisplayItem::CameraAction)
            .chain(self.captures.iter().cloned().map(DisplayItem::StaticImage))
            .chain(self.library_items.iter().cloned())
            .collect();
        self.pool.clamp_page(self.items.len());
    }

    /// Rebind the pool to the current page and request its thumbnails
    fn bind_page(&mut self) -> Task<Message> {
        let pending = self
            .pool
            .bind_page(&self.items, &self.selected, self.config.thumbnail_size());

        Task::batch(pending.into_iter().map(|(slot, pending)| {
            let ticket = pending.ticket;
            Task::perform(
                self.cache.clone().request_thumbnail(pending.request),
                move |picture| Message::ThumbnailDelivered {
                    slot,
                    ticket: ticket.clone(),
                    picture,
                },
            )
        }))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CellPressed(slot) => {
                let Some(item) = self.pool.item_index(slot).and_then(|i| self.items.get(i)) else {
                    return Task::none();
                };

                if let DisplayItem::CameraAction = item {
                    return self.launch_camera();
                }

                if let Some(key) = item.selection_key() {
                    let selected = if self.selected.remove(&key) {
                        false
                    } else {
                        self.selected.insert(key);
                        true
                    };
                    if let Some(cell) = self.pool.cell_mut(slot) {
                        cell.set_selected(selected);
                    }
                    self.status = format!("{} selected", self.selected.len());
                }

                Task::none()
            }
            Message::ThumbnailDelivered { slot, ticket, picture } => {
                self.pool.deliver(slot, &ticket, picture);
                Task::none()
            }
            Message::CaptureLoaded(Some(picture)) => {
                self.captures.insert(0, picture);
                self.pool.rewind();
                self.rebuild_items();
                self.bind_page()
            }
            Message::CaptureLoaded(None) => {
                self.status = "Could not open the picked image.".to_string();
                Task::none()
            }
            Message::ImportFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photos and Videos")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Importing from {}...", folder_path.display());
                    return Task::perform(
                        import_folder_async(folder_path, self.library_path.clone()),
                        Message::ImportComplete,
                    );
                }

                Task::none()
            }
            Message::ImportComplete(Ok(summary)) => {
                self.status = format!(
                    "Import complete! Added {} items, skipped {} duplicates.",
                    summary.imported_count, summary.skipped_count
                );
                Task::perform(load_items_async(self.library_path.clone()), Message::LibraryLoaded)
            }
            Message::ImportComplete(Err(e)) | Message::LibraryLoaded(Err(e)) => {
                tracing::error!("Library update failed: {}", e);
                self.status = format!("Library error: {}", e);
                Task::none()
            }
            Message::LibraryLoaded(Ok(items)) => {
                self.library_items = items;
                self.rebuild_items();
                self.bind_page()
            }
            Message::NextPage => {
                if self.pool.next_page(self.items.len()) {
                    return self.bind_page();
                }
                Task::none()
            }
            Message::PreviousPage => {
                if self.pool.previous_page() {
                    return self.bind_page();
                }
                Task::none()
            }
        }
    }

    /// Pick an image file and add it to the grid as a capture
    fn launch_camera(&mut self) -> Task<Message> {
        let picked = FileDialog::new()
            .set_title("Choose a Photo")
            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "bmp", "webp", "tif", "tiff"])
            .pick_file();

        match picked {
            Some(path) => Task::perform(load_capture_async(path), Message::CaptureLoaded),
            None => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let cells: Vec<Element<Message>> = self
            .pool
            .bound_cells()
            .map(|(slot, cell)| cell.view(Message::CellPressed(slot)))
            .collect();

        let grid_width = self.config.columns as f32 * (self.config.cell_size + GRID_SPACING);
        let grid = container(
            Wrap::with_elements(cells)
                .spacing(GRID_SPACING)
                .line_spacing(GRID_SPACING),
        )
        .max_width(grid_width);

        let page_label = format!(
            "Page {} of {}",
            self.pool.page() + 1,
            self.pool.page_count(self.items.len()).max(1)
        );
        let toolbar = row![
            button("Import Folder").on_press(Message::ImportFolder).padding(10),
            button("Previous").on_press(Message::PreviousPage).padding(10),
            text(page_label).size(16),
            button("Next").on_press(Message::NextPage).padding(10),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let content = column![
            text("Photo Picker").size(32),
            toolbar,
            scrollable(grid).height(Length::Fill),
            text(&self.status).size(16),
        ]
        .spacing(16)
        .padding(24)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn main() -> iced::Result {
    init_logging();

    let picker = match PhotoPicker::boot() {
        Ok(picker) => picker,
        Err(e) => {
            tracing::error!("Failed to start the photo picker: {}", e);
            std::process::exit(1);
        }
    };

    iced::application("Photo Picker", PhotoPicker::update, PhotoPicker::view)
        .theme(PhotoPicker::theme)
        .centered()
        .run_with(move || picker.start())
}

/// Import all supported files from a folder
/// Runs on the blocking pool; rusqlite::Connection is not Send, so the
/// import opens its own connection
async fn import_folder_async(folder_path: PathBuf, db_path: PathBuf) -> std::result::Result<ImportSummary, String> {
    tokio::task::spawn_blocking(move || {
        let library = MediaLibrary::open(&db_path)?;
        library.import_folder(&folder_path)
    })
    .await
    .map_err(PickerError::from)
    .and_then(|result| result)
    .map_err(|e| e.to_string())
}

/// Reload the grid's items from the library
async fn load_items_async(db_path: PathBuf) -> std::result::Result<Vec<DisplayItem>, String> {
    tokio::task::spawn_blocking(move || {
        let library = MediaLibrary::open(&db_path)?;
        library.verify_files()?;
        library.display_items()
    })
    .await
    .map_err(PickerError::from)
    .and_then(|result| result)
    .map_err(|e| e.to_string())
}

/// Decode a picked image into a static picture
async fn load_capture_async(path: PathBuf) -> Option<Picture> {
    let decoded = tokio::task::spawn_blocking(move || -> Result<Picture> {
        let image = image::open(&path)?;
        let image = if image.width() > CAPTURE_MAX_EDGE || image.height() > CAPTURE_MAX_EDGE {
            image.resize(CAPTURE_MAX_EDGE, CAPTURE_MAX_EDGE, image::imageops::FilterType::Lanczos3)
        } else {
            image
        };
        Ok(Picture::from_image(image.to_rgba8()))
    })
    .await
    .map_err(PickerError::from)
    .and_then(|result| result);

    match decoded {
        Ok(picture) => Some(picture),
        Err(e) => {
            tracing::warn!("Could not load picked image: {}", e);
            None
        }
    }
}
