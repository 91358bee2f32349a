//! Minimal HTML pages around the gate.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::auth::CurrentUser;

use super::state::AppState;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/dashboard">Dashboard</a></nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    ))
}

/// Public landing page.
pub async fn home(user: Option<CurrentUser>) -> Html<String> {
    let body = match user {
        Some(user) => format!(
            r#"<h1>Welcome</h1>
<p>Signed in as {}. <a href="/dashboard">Go to dashboard</a></p>"#,
            escape_html(user.email())
        ),
        None => r#"<h1>Welcome</h1>
<p><a href="/login">Log in</a> to reach the dashboard.</p>"#
            .to_string(),
    };
    layout("Home", &body)
}

/// Login form. Posts JSON to `/api/login` and moves to the home path on success.
pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    let home = escape_html(state.auth.gate().home_path());
    let body = format!(
        r#"<h1>Log in</h1>
<form id="login-form">
  <label>Email <input type="email" name="email" required></label>
  <label>Password <input type="password" name="password" required></label>
  <button type="submit">Log in</button>
</form>
<p id="login-error" role="alert"></p>
<script>
document.getElementById("login-form").addEventListener("submit", async (event) => {{
  event.preventDefault();
  const form = event.target;
  const response = await fetch("/api/login", {{
    method: "POST",
    headers: {{ "Content-Type": "application/json" }},
    body: JSON.stringify({{ email: form.email.value, password: form.password.value }}),
  }});
  const data = await response.json().catch(() => ({{}}));
  if (response.ok && data.success) {{
    window.location.href = "{home}";
  }} else {{
    document.getElementById("login-error").textContent = data.message || "Login failed";
  }}
}});
</script>"#
    );
    layout("Log in", &body)
}

/// Protected dashboard.
///
/// The gate normally guarantees a session here. Without one the handler sends
/// the caller to the login page instead of rendering.
pub async fn dashboard(State(state): State<AppState>, user: Option<CurrentUser>) -> Response {
    let Some(user) = user else {
        return Redirect::temporary(state.auth.gate().login_path()).into_response();
    };

    let body = format!(
        r#"<h1>Dashboard</h1>
<p>Logged in as: {}</p>
<form method="post" action="/api/logout">
  <button type="submit">Log out</button>
</form>"#,
        escape_html(user.email())
    );
    layout("Dashboard", &body).into_response()
}

/// Escape text for HTML element and attribute content.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
