//! Native window hosting the map page in an embedded webview.
//!
//! The output directory is served through a custom protocol instead of
//! `file://`, so the page can `fetch` the GeoJSON next to it.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop};
use tao::window::WindowBuilder;
use wry::http::header::{HeaderValue, CONTENT_TYPE};
use wry::http::{Response, StatusCode};
use wry::WebViewBuilder;

pub const PROTOCOL: &str = "rsmapview";

const WINDOW_WIDTH: f64 = 1200.0;
const WINDOW_HEIGHT: f64 = 890.0;

/// URL of `file_name` under the custom protocol, as the platform webview spells it
pub fn protocol_url(file_name: &str) -> String {
    let file_name = urlencoding::encode(file_name);
    if cfg!(any(target_os = "windows", target_os = "android")) {
        format!("http://{}.localhost/{}", PROTOCOL, file_name)
    } else {
        format!("{}://localhost/{}", PROTOCOL, file_name)
    }
}

/// Map a request path onto a file under `root`, refusing anything that
/// would leave it
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));
    if relative.as_os_str().is_empty() {
        return None;
    }
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("geojson") => "application/geo+json",
        Some("json") => "application/json",
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn not_found() -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Borrowed(&b"Not Found"[..]));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

/// Answer a custom-protocol request with the file it names under `root`
pub fn serve(root: &Path, request_path: &str) -> Response<Cow<'static, [u8]>> {
    let Some(path) = resolve(root, request_path) else {
        log::debug!("Refused webview request for {}", request_path);
        return not_found();
    };
    match std::fs::read(&path) {
        Ok(bytes) => {
            let mut response = Response::new(Cow::Owned(bytes));
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type(&path)));
            response
        }
        Err(e) => {
            log::debug!("Webview request {} failed: {}", path.display(), e);
            not_found()
        }
    }
}

/// Open `page` (a file name inside `root`) in a 1200x890 window and block
/// until the window is closed. The process exits when the event loop ends.
pub fn open_window(root: &Path, page: &str, title: &str) -> Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(title)
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)
        .context("Failed to create window")?;

    let root = root.to_path_buf();
    let builder = WebViewBuilder::new()
        .with_custom_protocol(PROTOCOL.to_string(), move |_webview_id, request| {
            serve(&root, request.uri().path())
        })
        .with_url(protocol_url(page));

    #[cfg(not(target_os = "linux"))]
    let webview = builder
        .build(&window)
        .context("Failed to create webview")?;

    #[cfg(target_os = "linux")]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .context("Window has no GTK container")?;
        builder
            .build_gtk(vbox)
            .context("Failed to create webview")?
    };

    log::info!("Opened map window: {}", title);
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        // the webview lives as long as the loop
        let _ = &webview;
        if let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } = event
        {
            *control_flow = ControlFlow::Exit;
        }
    })
}
