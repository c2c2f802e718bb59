//! Landing page and feature list

use axum::{extract::State, response::Html, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct FeatureListResponse {
    features: Option<Vec<String>>,
}

/// Input form with one numeric field per model feature
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.service.feature_list()))
}

pub async fn features(State(state): State<AppState>) -> Json<FeatureListResponse> {
    Json(FeatureListResponse {
        features: state.service.feature_list().map(|f| f.to_vec()),
    })
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Breast Tumor Classifier</title>
</head>
<body>
<h1>Breast Tumor Classifier</h1>
"#;

const PAGE_TAIL: &str = r#"<pre id="result"></pre>
<script>
document.getElementById("predict-form")?.addEventListener("submit", async (event) => {
  event.preventDefault();
  const response = await fetch("/predict", { method: "POST", body: new URLSearchParams(new FormData(event.target)) });
  document.getElementById("result").textContent = JSON.stringify(await response.json(), null, 2);
});
</script>
</body>
</html>
"#;

fn render_index(features: Option<&[String]>) -> String {
    let mut page = String::from(PAGE_HEAD);

    match features {
        Some(features) => {
            page.push_str("<form id=\"predict-form\" method=\"post\" action=\"/predict\">\n");
            for (i, name) in features.iter().enumerate() {
                let name = escape_html(name);
                page.push_str(&format!(
                    "<label for=\"f{i}\">{name}</label> <input id=\"f{i}\" name=\"{name}\" type=\"number\" step=\"any\" required><br>\n"
                ));
            }
            page.push_str("<button type=\"submit\">Predict</button>\n</form>\n");
        }
        None => {
            page.push_str("<p>Model not loaded. Predictions are unavailable.</p>\n");
        }
    }

    page.push_str(PAGE_TAIL);
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
