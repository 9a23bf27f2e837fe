//! Browser side of live reload.

use axum::http::header;
use axum::response::IntoResponse;

/// Reloads the page on every event, and once more after reconnecting so a
/// restarted server is picked up too.
const CLIENT_JS: &str = r#"(() => {
  const scheme = location.protocol === "https:" ? "wss:" : "ws:";
  let seen = false;
  const connect = () => {
    const socket = new WebSocket(`${scheme}//${location.host}/ws/live-reload`);
    socket.addEventListener("open", () => {
      if (seen) location.reload();
      seen = true;
    });
    socket.addEventListener("message", (event) => {
      const message = JSON.parse(event.data);
      if (message.type === "reload") location.reload();
    });
    socket.addEventListener("close", () => setTimeout(connect, 1000));
  };
  connect();
})();
"#;

/// Handle GET /live-reload.js.
pub(crate) async fn client_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        CLIENT_JS,
    )
}
