//! Admin editor pages (`/admin`), served only in development
//!
//! Each form posts one section; the handler swaps that section in the
//! shared [`ConfigEditor`] and redirects back to the editor page. The result
//! leaves the server only through `GET /admin/download`.

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use jly_common::site::editor::{optional_text, split_lines};
use jly_common::site::{load_site_config, ConfigEditor, FEATURE_TOGGLES, SITE_CONFIG_FILE};
use jly_common::{Icon, LinkEntry, SiteConfiguration};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::html::escape;
use super::landing::CONFIG_LOAD_FAILED;
use super::layout::{error_banner, render_document, PageMeta};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

type FormFields = HashMap<String, String>;

/// Build admin routes, all behind the environment gate
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_page))
        .route("/admin/site", post(update_site))
        .route("/admin/theme", post(update_theme))
        .route("/admin/youtube", post(update_youtube))
        .route("/admin/features", post(update_features))
        .route("/admin/wallpapers", post(update_wallpapers))
        .route("/admin/links/:index", post(update_link))
        .route("/admin/links/:index/up", post(move_link_up))
        .route("/admin/links/:index/down", post(move_link_down))
        .route("/admin/reload", post(reload))
        .route("/admin/download", get(download))
        .route_layer(middleware::from_fn_with_state(state, require_development))
}

/// Respond 404 outside development, as if the routes did not exist
pub async fn require_development(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.environment.is_development() {
        debug!(path = %request.uri().path(), "Admin route hidden outside development");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// Run `edit` against the working copy, loading it on first use
async fn with_editor<T>(
    state: &AppState,
    edit: impl FnOnce(&mut ConfigEditor) -> ApiResult<T>,
) -> ApiResult<T> {
    let mut slot = state.editor.lock().await;
    if slot.is_none() {
        let config = load_site_config(&state.config.site_config_path()).await?;
        info!(links = config.links.len(), "Admin editor loaded site config");
        *slot = Some(ConfigEditor::new(config));
    }
    let editor = slot
        .as_mut()
        .ok_or_else(|| ApiError::Internal("editor not loaded".to_string()))?;
    edit(editor)
}

fn field<'a>(form: &'a FormFields, name: &str) -> &'a str {
    form.get(name).map(String::as_str).unwrap_or("")
}

/// Unchecked checkboxes are simply absent from the form body
fn checkbox(form: &FormFields, name: &str) -> bool {
    form.contains_key(name)
}

fn back_to_editor() -> Redirect {
    Redirect::to("/admin")
}

/// GET /admin
pub async fn admin_page(State(state): State<AppState>) -> Html<String> {
    let meta = PageMeta::load(&state.config, "/admin")
        .await
        .with_page_title("Admin");

    let body = with_editor(&state, |editor| {
        let preview = editor.snapshot()?;
        Ok(render_editor(editor.config(), editor.is_dirty(), &preview))
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Admin editor unavailable: {}", e);
        error_banner(CONFIG_LOAD_FAILED)
    });

    Html(render_document(&meta, "admin", &body))
}

/// POST /admin/site
pub async fn update_site(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<Redirect> {
    with_editor(&state, |editor| {
        editor.update_site(|mut site| {
            site.title = field(&form, "title").to_string();
            site.description = field(&form, "description").to_string();
            site.bio_lines = split_lines(field(&form, "bio_lines"));
            site
        });
        Ok(())
    })
    .await?;
    Ok(back_to_editor())
}

/// POST /admin/theme
pub async fn update_theme(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<Redirect> {
    with_editor(&state, |editor| {
        editor.update_theme(|mut theme| {
            theme.background_image = field(&form, "background_image").trim().to_string();
            theme.logo_title_image = field(&form, "logo_title_image").trim().to_string();
            theme.footer_logo_image = field(&form, "footer_logo_image").trim().to_string();
            theme
        });
        Ok(())
    })
    .await?;
    Ok(back_to_editor())
}

/// POST /admin/youtube
pub async fn update_youtube(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<Redirect> {
    with_editor(&state, |editor| {
        editor.update_youtube(|mut youtube| {
            youtube.channel_id = field(&form, "channel_id").trim().to_string();
            youtube.latest_button_label = field(&form, "latest_button_label").to_string();
            youtube
        });
        Ok(())
    })
    .await?;
    Ok(back_to_editor())
}

/// POST /admin/features
pub async fn update_features(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<Redirect> {
    with_editor(&state, |editor| {
        editor.update_features(|mut features| {
            for (toggle, _) in FEATURE_TOGGLES {
                features.set(toggle, checkbox(&form, toggle.key()));
            }
            features.cheer_label = field(&form, "cheer_label").to_string();
            features.whispers = split_lines(field(&form, "whispers"));
            features
        });
        Ok(())
    })
    .await?;
    Ok(back_to_editor())
}

/// POST /admin/wallpapers
pub async fn update_wallpapers(
    State(state): State<AppState>,
    Form(form): Form<FormFields>,
) -> ApiResult<Redirect> {
    with_editor(&state, |editor| {
        editor.update_wallpapers(|mut wallpapers| {
            wallpapers.enabled = checkbox(&form, "enabled");
            wallpapers.title = field(&form, "title").to_string();
            wallpapers.note = field(&form, "note").to_string();
            wallpapers.local_base = field(&form, "local_base").trim().to_string();
            wallpapers.remote_base_url = optional_text(field(&form, "remote_base_url").trim());
            wallpapers.files = split_lines(field(&form, "files"));
            wallpapers
        });
        Ok(())
    })
    .await?;
    Ok(back_to_editor())
}

/// POST /admin/links/:index
pub async fn update_link(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<FormFields>,
) -> ApiResult<Redirect> {
    let icon: Icon = field(&form, "icon").parse()?;
    with_editor(&state, |editor| {
        editor.update_link(index, |_| LinkEntry {
            id: field(&form, "id").trim().to_string(),
            enabled: checkbox(&form, "enabled"),
            label: field(&form, "label").to_string(),
            url: field(&form, "url").trim().to_string(),
            icon,
            gradient: field(&form, "gradient").to_string(),
            badge: optional_text(field(&form, "badge")),
            badge_left: optional_text(field(&form, "badge_left")),
        })?;
        Ok(())
    })
    .await?;
    Ok(back_to_editor())
}

/// POST /admin/links/:index/up
pub async fn move_link_up(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Redirect> {
    let moved = with_editor(&state, |editor| Ok(editor.move_link_up(index))).await?;
    debug!(index, moved, "Move link up");
    Ok(back_to_editor())
}

/// POST /admin/links/:index/down
pub async fn move_link_down(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> ApiResult<Redirect> {
    let moved = with_editor(&state, |editor| Ok(editor.move_link_down(index))).await?;
    debug!(index, moved, "Move link down");
    Ok(back_to_editor())
}

/// POST /admin/reload
///
/// Drop the working copy; the next request reads the file again.
pub async fn reload(State(state): State<AppState>) -> Redirect {
    *state.editor.lock().await = None;
    info!("Admin editor working copy discarded");
    back_to_editor()
}

/// GET /admin/download
pub async fn download(State(state): State<AppState>) -> ApiResult<Response> {
    let json = with_editor(&state, |editor| Ok(editor.snapshot()?)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", SITE_CONFIG_FILE),
            ),
        ],
        json,
    )
        .into_response())
}

fn text_input(name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<label>{label}<input type="text" name="{name}" value="{value}"></label>"#,
        label = escape(label),
        name = name,
        value = escape(value),
    )
}

fn textarea(name: &str, label: &str, lines: &[String]) -> String {
    format!(
        r#"<label>{label}<textarea name="{name}" rows="4">{value}</textarea></label>"#,
        label = escape(label),
        name = name,
        value = escape(&lines.join("\n")),
    )
}

fn checkbox_input(name: &str, label: &str, checked: bool) -> String {
    format!(
        r#"<label class="check"><input type="checkbox" name="{}" value="on"{}> {}</label>"#,
        name,
        if checked { " checked" } else { "" },
        escape(label)
    )
}

fn section(title: &str, action: &str, fields: &str) -> String {
    format!(
        r#"<section class="admin-section"><h2>{}</h2><form method="post" action="{}">{}<button type="submit">套用</button></form></section>"#,
        escape(title),
        action,
        fields
    )
}

fn icon_select(current: Icon) -> String {
    let options: String = Icon::ALL
        .iter()
        .map(|icon| {
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                icon.as_str(),
                if *icon == current { " selected" } else { "" }
            )
        })
        .collect();
    format!(r#"<label>Icon<select name="icon">{}</select></label>"#, options)
}

fn render_link_editor(index: usize, count: usize, link: &LinkEntry) -> String {
    let fields = [
        text_input("id", "ID", &link.id),
        checkbox_input("enabled", "啟用", link.enabled),
        text_input("label", "標題", &link.label),
        text_input("url", "連結", &link.url),
        icon_select(link.icon),
        text_input("gradient", "漸層", &link.gradient),
        text_input("badge", "右上角標籤", link.badge.as_deref().unwrap_or("")),
        text_input("badge_left", "左側標籤", link.badge_left.as_deref().unwrap_or("")),
    ]
    .concat();

    let up = if index > 0 {
        format!(
            r#"<form method="post" action="/admin/links/{}/up"><button type="submit">上移</button></form>"#,
            index
        )
    } else {
        String::new()
    };
    let down = if index + 1 < count {
        format!(
            r#"<form method="post" action="/admin/links/{}/down"><button type="submit">下移</button></form>"#,
            index
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="admin-link" data-link-index="{index}"><form method="post" action="/admin/links/{index}">{fields}<button type="submit">套用</button></form><div class="admin-link-move">{up}{down}</div></div>"#,
    )
}

pub fn render_editor(config: &SiteConfiguration, dirty: bool, preview: &str) -> String {
    let mut body = String::from(r#"<main class="admin"><h1>網站設定編輯器</h1>"#);

    body.push_str(&format!(
        r#"<p class="admin-status">{}</p><div class="admin-actions"><a class="button" href="/admin/download" download="{}">下載 {}</a><form method="post" action="/admin/reload"><button type="submit">重新載入</button></form></div>"#,
        if dirty { "有尚未下載的變更" } else { "尚無變更" },
        SITE_CONFIG_FILE,
        SITE_CONFIG_FILE
    ));

    body.push_str(&section(
        "網站文字",
        "/admin/site",
        &[
            text_input("title", "標題", &config.site.title),
            text_input("description", "描述", &config.site.description),
            textarea("bio_lines", "自我介紹（一行一句）", &config.site.bio_lines),
        ]
        .concat(),
    ));

    body.push_str(&section(
        "主題圖片",
        "/admin/theme",
        &[
            text_input("background_image", "背景", &config.theme.background_image),
            text_input("logo_title_image", "標題 Logo", &config.theme.logo_title_image),
            text_input("footer_logo_image", "頁尾 Logo", &config.theme.footer_logo_image),
        ]
        .concat(),
    ));

    body.push_str(&section(
        "YouTube",
        "/admin/youtube",
        &[
            text_input("channel_id", "頻道 ID", &config.youtube.channel_id),
            text_input(
                "latest_button_label",
                "最新作品按鈕文字",
                &config.youtube.latest_button_label,
            ),
        ]
        .concat(),
    ));

    let mut feature_fields: String = FEATURE_TOGGLES
        .iter()
        .map(|(toggle, label)| {
            checkbox_input(toggle.key(), label, config.features.is_enabled(*toggle))
        })
        .collect();
    feature_fields.push_str(&text_input("cheer_label", "加油按鈕文字", &config.features.cheer_label));
    feature_fields.push_str(&textarea("whispers", "碎碎念（一行一句）", &config.features.whispers));
    body.push_str(&section("功能開關", "/admin/features", &feature_fields));

    body.push_str(r#"<section class="admin-section"><h2>連結</h2>"#);
    let count = config.links.len();
    for (index, link) in config.links.iter().enumerate() {
        body.push_str(&render_link_editor(index, count, link));
    }
    body.push_str("</section>");

    let wallpapers = &config.wallpapers;
    body.push_str(&section(
        "桌布",
        "/admin/wallpapers",
        &[
            checkbox_input("enabled", "開放桌布下載", wallpapers.enabled),
            text_input("title", "標題", &wallpapers.title),
            text_input("note", "說明", &wallpapers.note),
            text_input("local_base", "本地路徑", &wallpapers.local_base),
            text_input(
                "remote_base_url",
                "遠端網址",
                wallpapers.remote_base_url.as_deref().unwrap_or(""),
            ),
            textarea("files", "檔名（一行一個）", &wallpapers.files),
        ]
        .concat(),
    ));

    body.push_str(&format!(
        r#"<section class="admin-section"><h2>JSON 預覽</h2><pre class="admin-preview">{}</pre></section></main>"#,
        escape(preview)
    ));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_marks_edges() {
        let mut config = SiteConfiguration::default();
        config.links = vec![
            LinkEntry {
                id: "a".to_string(),
                ..Default::default()
            },
            LinkEntry {
                id: "b".to_string(),
                ..Default::default()
            },
        ];
        let html = render_editor(&config, false, "{}");
        assert!(!html.contains("/admin/links/0/up"));
        assert!(html.contains("/admin/links/0/down"));
        assert!(html.contains("/admin/links/1/up"));
        assert!(!html.contains("/admin/links/1/down"));
        assert!(html.contains("尚無變更"));
    }

    #[test]
    fn test_icon_selector_is_closed() {
        let html = icon_select(Icon::Crown);
        assert_eq!(html.matches("<option").count(), Icon::ALL.len());
        assert!(html.contains(r#"<option value="Crown" selected>"#));
    }

    #[test]
    fn test_feature_checkboxes_use_toggle_keys() {
        let mut config = SiteConfiguration::default();
        config.features.enable_youtube_shuffle = true;
        let html = render_editor(&config, true, "{}");
        assert!(html.contains(r#"name="enableYouTubeShuffle" value="on" checked"#));
        assert!(html.contains(r#"name="enableWhispers" value="on">"#));
        assert!(html.contains("有尚未下載的變更"));
    }
}
