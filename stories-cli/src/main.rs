use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stories_client::{HttpStoryFeed, ImageFile, StoriesClientError};
use stories_core::{
    Category, CategoryFilter, ComposeForm, CoreError, EmptyState, PostCard, PostDetail,
    PostQuery, SortOrder, Viewer,
};
use tracing::debug;

mod logging;
mod settings;

use logging::init_logging;
use settings::Settings;

const VIEWER_FILE: &str = ".stories_viewer";

#[derive(Debug, Parser)]
#[command(name = "stories-cli", version, about = "CLI клиент блога Stories")]
struct Cli {
    /// Адрес блог-API (перекрывает STORIES_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Список постов с поиском, фильтром по категории и сортировкой.
    List {
        #[arg(long)]
        search: Option<String>,
        /// all, general, health, technology, lifestyle или personal.
        #[arg(long, default_value = "all", value_parser = parse_category_filter)]
        category: CategoryFilter,
        /// newest или mostLiked.
        #[arg(long, default_value = "newest", value_parser = parse_sort)]
        sort: SortOrder,
    },
    /// Полный текст поста.
    Show {
        #[arg(long)]
        id: String,
    },
    /// Публикация поста (требует входа).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "general", value_parser = parse_category)]
        category: Category,
        /// Картинка для загрузки на медиахостинг.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Поставить или снять лайк (требует входа).
    Like {
        #[arg(long)]
        id: String,
    },
    /// Запомнить пользователя, выданного провайдером identity.
    Login {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Забыть пользователя.
    Logout,
    /// Список категорий и их отображение на категории API.
    Categories,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let mut settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    if let Some(server) = cli.server {
        settings.api_url = normalize_server(server);
    }
    debug!(api = %settings.api_url, likes = %settings.likes_url, "settings loaded");

    let mut feed = HttpStoryFeed::connect(&settings.client_config()).map_err(map_client_error)?;
    if let Some(viewer) = load_viewer().context("не удалось прочитать .stories_viewer")? {
        feed.sign_in(viewer);
    }

    match cli.command {
        Command::List {
            search,
            category,
            sort,
        } => {
            // при ошибке лента уже пуста, а сама ошибка в логе
            let _ = feed.refresh().await;
            let query = PostQuery::new()
                .with_search(search.unwrap_or_default())
                .with_category(category)
                .with_sort(sort);
            print_cards(&feed.cards(&query), &query);
        }
        Command::Show { id } => {
            feed.refresh().await.map_err(map_client_error)?;
            let detail = feed.detail(&id).map_err(map_client_error)?;
            print_detail(&detail);
        }
        Command::Create {
            title,
            content,
            category,
            image,
        } => {
            let image = match image {
                Some(path) => Some(
                    ImageFile::read(&path)
                        .await
                        .with_context(|| format!("не удалось прочитать {}", path.display()))?,
                ),
                None => None,
            };
            let form = ComposeForm::new(title, content, category);
            feed.publish(form, image)
                .await
                .map_err(|err| anyhow::anyhow!(err.publish_message()))?;
            println!("Пост опубликован. Постов в ленте: {}", feed.store().len());
        }
        Command::Like { id } => {
            if feed.viewer().is_none() {
                anyhow::bail!("Please login to like posts");
            }
            feed.refresh().await.map_err(map_client_error)?;
            let change = feed.toggle_like(&id).await.map_err(map_client_error)?;
            let verb = if change.liked { "Лайк поставлен" } else { "Лайк снят" };
            println!("{verb}: id={id}, likes={}", change.likes);
        }
        Command::Login {
            user_id,
            name,
            email,
        } => {
            let viewer = Viewer {
                id: user_id,
                full_name: name,
                email,
            };
            persist_viewer(&viewer).context("не удалось сохранить пользователя")?;
            println!("Вход выполнен: {} ({})", viewer.display_name(), viewer.id);
        }
        Command::Logout => {
            clear_viewer().context("не удалось удалить .stories_viewer")?;
            println!("Выход выполнен");
        }
        Command::Categories => {
            for category in Category::ALL {
                println!(
                    "{:<12} {:<20} -> {}",
                    category.value(),
                    category.label(),
                    category.backend()
                );
            }
        }
    }

    Ok(())
}

fn parse_category_filter(raw: &str) -> Result<CategoryFilter, String> {
    raw.parse::<CategoryFilter>().map_err(|err| err.to_string())
}

fn parse_category(raw: &str) -> Result<Category, String> {
    raw.parse::<Category>().map_err(|err| err.to_string())
}

fn parse_sort(raw: &str) -> Result<SortOrder, String> {
    raw.parse::<SortOrder>().map_err(|err| err.to_string())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_viewer_content(raw: &str) -> Option<Viewer> {
    let viewer = serde_json::from_str::<Viewer>(raw.trim()).ok()?;
    if viewer.id.trim().is_empty() {
        return None;
    }
    Some(viewer)
}

fn load_viewer() -> io::Result<Option<Viewer>> {
    load_viewer_from(Path::new(VIEWER_FILE))
}

fn load_viewer_from(path: &Path) -> io::Result<Option<Viewer>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)?;
    Ok(parse_viewer_content(&raw))
}

fn persist_viewer(viewer: &Viewer) -> io::Result<()> {
    persist_viewer_to(Path::new(VIEWER_FILE), viewer)
}

fn persist_viewer_to(path: &Path, viewer: &Viewer) -> io::Result<()> {
    let raw = serde_json::to_string(viewer).map_err(io::Error::other)?;
    fs::write(path, raw)
}

fn clear_viewer() -> io::Result<()> {
    match fs::remove_file(VIEWER_FILE) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

fn map_client_error(err: StoriesClientError) -> anyhow::Error {
    let message = match err {
        StoriesClientError::Unauthorized | StoriesClientError::Core(CoreError::NotSignedIn) => {
            "требуется вход: выполните `stories-cli login --user-id ...`".to_string()
        }
        StoriesClientError::NotFound => "ресурс не найден".to_string(),
        StoriesClientError::Core(CoreError::PostNotFound(id)) => format!("пост не найден: {id}"),
        StoriesClientError::Core(err) => format!("некорректные данные: {err}"),
        StoriesClientError::InvalidRequest(message) => format!("некорректный запрос: {message}"),
        StoriesClientError::Rejected(message) => format!("сервер отклонил запрос: {message}"),
        StoriesClientError::Upload(message) => format!("ошибка загрузки картинки: {message}"),
        StoriesClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_cards(cards: &[PostCard], query: &PostQuery) {
    if cards.is_empty() {
        println!("{}", EmptyState::for_query(query).message());
        return;
    }

    println!("Постов: {}", cards.len());
    for card in cards {
        let heart = if card.liked { "♥" } else { "♡" };
        let owner = if card.can_manage { " (ваш)" } else { "" };
        println!();
        println!("[{}] {}{owner}", card.id, card.title);
        println!("  {} · {} · {heart} {} · 💬 {}", card.category, card.date, card.likes, card.comments);
        println!("  {}", card.preview);
        if card.read_more {
            println!("  Read More: stories-cli show --id {}", card.id);
        }
    }
}

fn print_detail(detail: &PostDetail) {
    let heart = if detail.liked { "♥" } else { "♡" };
    println!("{}", detail.title);
    println!("[{}] {} · {}", detail.author_initial, detail.author, detail.date);
    if let Some(url) = &detail.image_url {
        println!("image: {url}");
    }
    println!();
    println!("{}", detail.content);
    println!();
    println!("{heart} {} · 💬 {}", detail.likes, detail.comments);
}
