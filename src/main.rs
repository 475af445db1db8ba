use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use novelista::models::{BookManuscript, Language, StoryParameters};
use novelista::services::llm::LlmClient;
use novelista::services::renderer::{self, DOCX_MIME, RenderOptions};
use novelista::services::book;
use novelista::utils::sanitize_filename;

#[derive(Clone)]
struct AppState {
    llm_client: Arc<LlmClient>,
    // The session manuscript: replaced by each generation run, dropped by
    // /clear, read by /download.
    manuscript: Arc<Mutex<Option<BookManuscript>>>,
    config: AppConfig,
}

#[derive(Debug, Clone)]
struct AppConfig {
    min_chapter_words: usize,
    paragraph_spacing_pt: u32,
}

impl AppConfig {
    fn from_env() -> Self {
        let min_chapter_words = std::env::var("MIN_CHAPTER_WORDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let paragraph_spacing_pt = std::env::var("PARAGRAPH_SPACING_PT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(6);
        AppConfig {
            min_chapter_words,
            paragraph_spacing_pt,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let llm_client = Arc::new(LlmClient::new()?);

    let app_state = AppState {
        llm_client,
        manuscript: Arc::new(Mutex::new(None)),
        config: AppConfig::from_env(),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/download/:id", get(download))
        .route("/clear", post(clear))
        .route("/health", get(health_check))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        );

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    title: String,
    genre: String,
    audience: String,
    chapter_count: u32,
    #[serde(default)]
    setup: String,
    #[serde(default)]
    conflict: String,
    #[serde(default)]
    resolution: String,
    #[serde(default)]
    plot: String,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    author_bio: String,
    language: String,
    #[serde(default)]
    include_introduction: Option<String>,
    #[serde(default)]
    include_conclusion: Option<String>,
}

impl GenerateForm {
    fn into_parameters(self) -> StoryParameters {
        StoryParameters {
            title: self.title.trim().to_string(),
            genre: self.genre.trim().to_string(),
            audience: self.audience.trim().to_string(),
            chapter_count: self.chapter_count,
            setup: filled(self.setup),
            conflict: filled(self.conflict),
            resolution: filled(self.resolution),
            plot: filled(self.plot),
            instructions: filled(self.instructions),
            author_name: filled(self.author_name),
            author_bio: filled(self.author_bio),
            language: Language::parse(&self.language),
            include_introduction: self.include_introduction.is_some(),
            include_conclusion: self.include_conclusion.is_some(),
        }
    }
}

fn filled(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn generate(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let params = form.into_parameters();
    if let Err(err) = params.validate() {
        return Err((StatusCode::BAD_REQUEST, Html(error_page(&err.to_string()))));
    }

    tracing::info!(title = %params.title, chapters = params.chapter_count, "starting generation");

    let manuscript = book::assemble(
        state.llm_client.as_ref(),
        &params,
        state.config.min_chapter_words,
        |completed, total| {
            tracing::info!(completed, total, "unit finished");
        },
    )
    .await;

    let page = result_page(&manuscript);
    *state.manuscript.lock().await = Some(manuscript);

    Ok(Html(page))
}

async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, (StatusCode, Html<String>)> {
    let guard = state.manuscript.lock().await;
    let manuscript = guard.as_ref().filter(|m| m.id == id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Html(error_page("No generated book is available for that link.")),
        )
    })?;

    let options = RenderOptions {
        paragraph_spacing_pt: state.config.paragraph_spacing_pt,
    };
    let bytes = renderer::render(manuscript, &options).map_err(|err| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(error_page(&err.to_string())),
        )
    })?;

    let filename = format!("{}.docx", sanitize_filename(&manuscript.title));
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn clear(State(state): State<AppState>) -> Redirect {
    state.manuscript.lock().await.take();
    Redirect::to("/")
}

async fn index() -> Html<String> {
    let html_content = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Novel Generator</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; max-width: 720px; }
            .info-box { background-color: #f0f8ff; padding: 20px; border-radius: 8px; margin: 20px 0; }
            label { display: block; margin-top: 12px; font-weight: bold; }
            input[type=text], input[type=number], textarea, select { width: 100%; padding: 6px; }
            button { margin-top: 20px; padding: 10px 20px; }
        </style>
    </head>
    <body>
        <h1>Novel Generator</h1>

        <div class="info-box">
            <p>Describe your novel and the service will generate it chapter by
            chapter, then hand you a formatted Word document.</p>
        </div>

        <form method="post" action="/generate">
            <label>Title</label>
            <input type="text" name="title" required>

            <label>Genre</label>
            <select name="genre">
                <option>Science Fiction</option>
                <option>Fantasy</option>
                <option>Romance</option>
                <option>Mystery</option>
                <option>Drama</option>
                <option>Horror</option>
                <option>Adventure</option>
                <option>Historical Fiction</option>
                <option>Comedy</option>
                <option>Thriller</option>
                <option>Dystopia</option>
                <option>Magical Realism</option>
            </select>

            <label>Audience</label>
            <select name="audience">
                <option>Children</option>
                <option>Teens</option>
                <option>Adults</option>
            </select>

            <label>Number of chapters</label>
            <input type="number" name="chapter_count" min="1" max="50" value="5">

            <h2>Plot</h2>
            <label>Setup</label>
            <textarea name="setup" placeholder="Introduce the setting and main characters."></textarea>
            <label>Conflict</label>
            <textarea name="conflict" placeholder="Describe the central challenge."></textarea>
            <label>Resolution</label>
            <textarea name="resolution" placeholder="Explain how the story resolves."></textarea>
            <label>Or a free-form plot</label>
            <textarea name="plot" placeholder="Used when the three fields above are not all filled."></textarea>

            <label>Special instructions (optional)</label>
            <textarea name="instructions" placeholder="Example: include a mysterious character in every chapter."></textarea>

            <label>Author name (optional)</label>
            <input type="text" name="author_name">
            <label>Author bio (optional)</label>
            <textarea name="author_bio"></textarea>

            <label>Language</label>
            <select name="language">
                <option value="english">English</option>
                <option value="spanish">Spanish</option>
            </select>

            <label><input type="checkbox" name="include_introduction"> Include an introduction</label>
            <label><input type="checkbox" name="include_conclusion"> Include a conclusion</label>

            <button type="submit">Generate Novel</button>
        </form>
    </body>
    </html>
    "#
    .to_string();

    Html(html_content)
}

fn result_page(manuscript: &BookManuscript) -> String {
    let mut chapters = String::new();
    for chapter in &manuscript.chapters {
        chapters.push_str(&format!(
            "<details><summary>{} ({} words)</summary><p>{}</p></details>\n",
            html_escape::encode_text(&chapter.label),
            chapter.word_count,
            html_escape::encode_text(&chapter.body).replace('\n', "<br>"),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; max-width: 720px; }}
        details {{ margin: 8px 0; }}
        summary {{ font-weight: bold; cursor: pointer; }}
        .actions {{ margin-top: 20px; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>Total words: <strong>{total}</strong></p>
    {chapters}
    <div class="actions">
        <a href="/download/{id}">Download as Word document</a>
        <form method="post" action="/clear"><button type="submit">Discard and start over</button></form>
    </div>
</body>
</html>"#,
        title = html_escape::encode_text(&manuscript.title),
        total = manuscript.total_word_count,
        chapters = chapters,
        id = manuscript.id,
    )
}

fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Novel Generator</title><meta charset="utf-8"></head>
<body>
    <h1>Something went wrong</h1>
    <p>{}</p>
    <p><a href="/">Back to the form</a></p>
</body>
</html>"#,
        html_escape::encode_text(message)
    )
}
