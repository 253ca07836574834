//! Interactive book browser.
//!
//! Opens one album in a [`BookSession`] and reads commands from the
//! terminal, printing the visible spread after each one.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use dialoguer::{Input, Select};

use keepsake_book::{Book, JumpOutcome, PageSide, PageView, RelocationOutcome, ViewportMode};
use keepsake_core::config::AppConfig;
use keepsake_core::error::AppError;
use keepsake_core::result::AppResult;
use keepsake_core::types::{AlbumId, PhotoId};
use keepsake_service::{AppServices, BookSession};

use super::Credentials;
use crate::commands::photo::read_files;
use crate::output;

const HELP: &str = "\
  next | n               turn forward
  prev | p               turn back
  jump <Mon D, YYYY>     go to a date (falls back to the same month)
  layout | l             cycle 6 -> 9 -> 1 photos per page
  width <px>             change the viewport width
  add <path>...          upload photos into the album
  delete <photo-id>      delete a photo (owner only)
  describe <id> [text]   set or clear a description
  show                   redraw the current spread
  quit | q               leave";

/// Arguments for the browse command
#[derive(Debug, Args)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub creds: Credentials,

    /// Album to open; prompts when omitted
    pub album: Option<AlbumId>,

    /// Viewport width in pixels
    #[arg(short, long)]
    pub width: Option<u32>,
}

/// One line of browser input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Next,
    Prev,
    Jump(String),
    Layout,
    Width(u32),
    Add(Vec<PathBuf>),
    Delete(PhotoId),
    Describe(PhotoId, Option<String>),
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "" | "show" => BrowseCommand::Show,
        "n" | "next" => BrowseCommand::Next,
        "p" | "prev" => BrowseCommand::Prev,
        "l" | "layout" => BrowseCommand::Layout,
        "q" | "quit" | "exit" => BrowseCommand::Quit,
        "h" | "help" | "?" => BrowseCommand::Help,
        "jump" if !rest.is_empty() => BrowseCommand::Jump(rest.to_string()),
        "width" => rest
            .parse()
            .map(BrowseCommand::Width)
            .map_err(|_| format!("Not a width: '{rest}'"))?,
        "add" if !rest.is_empty() => {
            BrowseCommand::Add(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "delete" => BrowseCommand::Delete(parse_photo_id(rest)?),
        "describe" => {
            let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let text = text.trim();
            BrowseCommand::Describe(
                parse_photo_id(id)?,
                (!text.is_empty()).then(|| text.to_string()),
            )
        }
        _ => return Err(format!("Unknown command '{line}'. Type 'help'.")),
    };
    Ok(command)
}

fn parse_photo_id(raw: &str) -> Result<PhotoId, String> {
    raw.parse().map_err(|_| format!("Not a photo id: '{raw}'"))
}

pub async fn execute(args: &BrowseArgs, config: AppConfig) -> AppResult<()> {
    let (services, _) = super::signed_in(config, &args.creds).await?;

    let album_id = match args.album {
        Some(id) => id,
        None => pick_album(&services).await?,
    };

    let mut session = BookSession::new(
        services.albums.clone(),
        services.photos.clone(),
        services.config.book.clone(),
    )?;
    if let Some(width) = args.width {
        session.book_mut().set_viewport_width(width);
    }

    let title = session.open_album(album_id).await?.title.clone();
    let role = if session.is_owner() { "owner" } else { "member" };
    println!("{title} ({role}, {} photos)", session.book().photos().len());
    render(session.book());

    loop {
        let line: String = Input::new()
            .with_prompt("book")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(msg) => {
                output::print_warning(&msg);
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                println!("{HELP}");
                continue;
            }
            BrowseCommand::Show => {}
            BrowseCommand::Next => {
                if !session.book_mut().next() {
                    output::print_warning("Already at the last page");
                }
            }
            BrowseCommand::Prev => {
                if !session.book_mut().prev() {
                    output::print_warning("Already at the cover");
                }
            }
            BrowseCommand::Jump(label) => {
                let outcome = session.book_mut().jump_to_date(&label);
                if !outcome.is_found() {
                    output::print_warning(&format!("No photos found for {label}"));
                } else if matches!(outcome, JumpOutcome::SameMonth { .. }) {
                    output::print_warning(&format!("No photos on {label}; showing that month"));
                }
            }
            BrowseCommand::Layout => {
                let change = session.book_mut().request_layout_change(Instant::now());
                if change.relocation == RelocationOutcome::AnchorLost {
                    output::print_warning("The photo you were looking at is gone");
                }
                output::print_success(&format!("{} photos per page", change.layout));
            }
            BrowseCommand::Width(width) => {
                let mode = session.book_mut().set_viewport_width(width);
                output::print_success(&format!("{width}px, {} view", mode_name(mode)));
            }
            BrowseCommand::Add(paths) => {
                let files = read_files(&paths).await;
                match session.add_photos(files).await {
                    Ok(stored) => output::print_success(&format!(
                        "{} of {} photos added",
                        stored.len(),
                        paths.len()
                    )),
                    Err(e) => output::print_error(&e.to_string()),
                }
            }
            BrowseCommand::Delete(photo_id) => match session.delete_photo(photo_id).await {
                Ok(()) => output::print_success("Photo deleted"),
                Err(e) => output::print_error(&e.to_string()),
            },
            BrowseCommand::Describe(photo_id, text) => {
                match session.describe_photo(photo_id, text.as_deref()).await {
                    Ok(_) => output::print_success("Description updated"),
                    Err(e) => output::print_error(&e.to_string()),
                }
            }
        }
        session.book_mut().settle(Instant::now());
        render(session.book());
    }

    session.close();
    services.auth.sign_out().await;
    Ok(())
}

async fn pick_album(services: &AppServices) -> AppResult<AlbumId> {
    let albums = services.albums.list_mine().await?;
    if albums.is_empty() {
        return Err(AppError::not_found("You have no albums yet"));
    }

    let titles: Vec<&str> = albums.iter().map(|album| album.title.as_str()).collect();
    let index = Select::new()
        .with_prompt("Album")
        .items(&titles)
        .default(0)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
    Ok(albums[index].id)
}

fn mode_name(mode: ViewportMode) -> &'static str {
    match mode {
        ViewportMode::Mobile => "mobile",
        ViewportMode::Desktop => "desktop",
    }
}

fn render(book: &Book) {
    let view = book.visible_spread();
    println!();
    println!(
        "== spread {} of {} | {} per page | {} ==",
        view.spread,
        view.leaf_count,
        view.layout,
        mode_name(view.mode)
    );
    if book.photos().is_empty() {
        println!("  (this album has no photos yet)");
        return;
    }

    let (columns, _) = view.layout.shape();
    for page in [&view.left, &view.right].into_iter().flatten() {
        render_page(page, columns);
    }
}

fn render_page(page: &PageView<'_>, columns: usize) {
    let side = match page.side {
        PageSide::Left => "left",
        PageSide::Right => "right",
        PageSide::Single => "page",
    };
    println!("-- {side} | page {} | {} --", page.number, page.header);

    for row in page.photos.chunks(columns.max(1)) {
        let cells: Vec<String> = row
            .iter()
            .map(|photo| {
                let caption = photo.description.as_deref().unwrap_or("");
                format!("[{} {}] {}", photo.label, short_id(photo.id), caption)
            })
            .collect();
        println!("  {}", cells.join("  "));
    }

    let mut controls = Vec::new();
    if page.can_prev {
        controls.push("< prev");
    }
    if page.can_next {
        controls.push("next >");
    }
    if !controls.is_empty() {
        println!("  {}", controls.join("   "));
    }
}

fn short_id(id: PhotoId) -> String {
    id.to_string().chars().take(8).collect()
}
