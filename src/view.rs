use crate::controller::{GenerationFailure, ViewState};
use crate::error::FormError;
use crate::form::{FormDraft, CALLS_TO_ACTION, REQUIRED_FIELDS, TONES};
use crate::models::{BusinessField, BusinessInfo, GeneratedAd};
use crate::preview::{AdPreview, CtaLabelMode, SocialPlatform};
use crate::utils::html;
use std::fmt::Write;

const TITLE: &str = "Social Ad Generator AI";

const STYLE: &str = r#"
body { margin: 0; min-height: 100vh; background: #0f172a; color: #fff; font-family: system-ui, sans-serif; display: flex; flex-direction: column; align-items: center; justify-content: center; padding: 2rem; box-sizing: border-box; }
header { text-align: center; margin-bottom: 2.5rem; }
header p { color: #94a3b8; max-width: 42rem; }
form, .panel { width: 100%; max-width: 32rem; }
label { display: block; font-size: .875rem; color: #cbd5e1; margin-top: 1.25rem; }
input, textarea, select { display: block; width: 100%; margin-top: .25rem; padding: .5rem .75rem; background: #1e293b; color: #fff; border: 1px solid #334155; border-radius: .375rem; box-sizing: border-box; }
button { cursor: pointer; border: 0; border-radius: .375rem; padding: .75rem 1rem; font-weight: 600; }
.primary { width: 100%; margin-top: 1.5rem; background: #4f46e5; color: #fff; }
.secondary { width: 100%; margin-top: 1rem; background: #1e293b; color: #e2e8f0; border: 1px solid #475569; }
.card { background: #1e293b; border: 1px solid #334155; border-radius: .5rem; overflow: hidden; max-width: 28rem; width: 100%; }
.card .who { padding: 1rem; border-bottom: 1px solid #334155; }
.card .who small { color: #94a3b8; }
.card .copy { padding: 1rem; }
.card img { width: 100%; aspect-ratio: 1 / 1; object-fit: cover; display: block; }
.card .foot { display: flex; justify-content: space-between; align-items: center; padding: 1rem; }
.card .foot a { background: #4f46e5; color: #fff; padding: .5rem 1rem; border-radius: .375rem; text-decoration: none; font-weight: 700; }
.social { display: flex; gap: .5rem; margin-top: 1rem; }
.social button { flex: 1; background: #334155; color: #fff; }
.error { text-align: center; padding: 1.5rem; border: 1px solid #ef4444; border-radius: .5rem; background: rgba(127, 29, 29, .2); }
.error button { background: #dc2626; color: #fff; margin-top: 1rem; }
.notice { color: #fca5a5; }
"#;

// Reloads once the pushed state is no longer loading
const RELOAD_ON_EVENT: &str = r#"<script>
(function () {
  var ws = new WebSocket((location.protocol === "https:" ? "wss://" : "ws://") + location.host + "/ws");
  ws.onmessage = function (msg) {
    var event = JSON.parse(msg.data);
    if (event.state !== "loading") { location.reload(); }
  };
})();
</script>"#;

// Pushes single field edits so the draft survives a reload
const SYNC_FIELDS: &str = r#"<script>
document.querySelectorAll("[data-field]").forEach(function (el) {
  el.addEventListener("change", function () {
    fetch("/api/form", {
      method: "PATCH",
      headers: { "content-type": "application/json" },
      body: JSON.stringify({ field: el.name, value: el.value })
    });
  });
});
</script>"#;

const UPLOAD: &str = r#"<script>
document.querySelectorAll("[data-platform]").forEach(function (el) {
  el.addEventListener("click", function () {
    fetch("/upload/" + el.dataset.platform, { method: "POST" })
      .then(function (r) { return r.text(); })
      .then(function (text) { alert(text); });
  });
});
</script>"#;

pub fn render_page(state: &ViewState, mode: CtaLabelMode, problem: Option<&FormError>) -> String {
    let content = match state {
        ViewState::Form(draft) => render_form(draft, problem),
        ViewState::Loading(_) => render_loading(),
        ViewState::Preview { info, ad } => render_preview(info, ad, mode),
        ViewState::Error(failure) => render_error(failure),
    };
    layout(&content)
}

fn layout(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header>
<h1>&#10024; {title}</h1>
<p>Fill in your business details and let our AI create the perfect social media ad for you in seconds.</p>
</header>
<main>
{content}
</main>
</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        content = content,
    )
}

pub fn render_form(draft: &FormDraft, problem: Option<&FormError>) -> String {
    let mut out = String::from(r#"<form method="post" action="/generate">"#);

    if let Some(FormError::MissingFields(missing)) = problem {
        let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
        let _ = write!(
            out,
            r#"<p class="notice">Please fill in: {}</p>"#,
            html(&labels.join(", "))
        );
    }

    for field in [
        BusinessField::Name,
        BusinessField::Description,
        BusinessField::Product,
        BusinessField::TargetAudience,
    ] {
        text_input(&mut out, draft, field);
    }
    select(&mut out, draft, BusinessField::Tone, &TONES);
    select(&mut out, draft, BusinessField::CallToAction, &CALLS_TO_ACTION);

    out.push_str(r#"<button type="submit" class="primary">&#10024; Generate Ad</button></form>"#);
    out.push_str(SYNC_FIELDS);
    out
}

fn text_input(out: &mut String, draft: &FormDraft, field: BusinessField) {
    let name = field.wire_name();
    let value = html(draft.get(field));
    let required = if REQUIRED_FIELDS.contains(&field) { " required" } else { "" };

    let _ = write!(out, r#"<label for="{name}">{}</label>"#, field.label());
    if field == BusinessField::Description {
        let _ = write!(
            out,
            r#"<textarea id="{name}" name="{name}" rows="3" data-field{required}>{value}</textarea>"#
        );
    } else {
        let _ = write!(
            out,
            r#"<input type="text" id="{name}" name="{name}" value="{value}" data-field{required}>"#
        );
    }
}

fn select(out: &mut String, draft: &FormDraft, field: BusinessField, options: &[&str]) {
    let name = field.wire_name();
    let current = draft.get(field);

    let _ = write!(
        out,
        r#"<label for="{name}">{}</label><select id="{name}" name="{name}" data-field>"#,
        field.label()
    );
    for option in options {
        let selected = if *option == current { " selected" } else { "" };
        let option = html(option);
        let _ = write!(out, r#"<option value="{option}"{selected}>{option}</option>"#);
    }
    out.push_str("</select>");
}

pub fn render_loading() -> String {
    format!(
        r#"<div class="panel" style="text-align: center">
<h2>Generating your masterpiece...</h2>
<p>The AI is crafting the perfect ad. This might take a moment.</p>
<noscript><meta http-equiv="refresh" content="2"></noscript>
</div>
{}"#,
        RELOAD_ON_EVENT
    )
}

pub fn render_preview(info: &BusinessInfo, ad: &GeneratedAd, mode: CtaLabelMode) -> String {
    let preview = AdPreview::new(ad, &info.call_to_action, mode);
    let mut out = format!(
        r#"<div class="card">
<div class="who"><strong>Your Business</strong><br><small>Sponsored</small></div>
<div class="copy"><h3>{headline}</h3><p>{body}</p></div>
<img src="{image}" alt="Generated Ad Visual">
<div class="foot"><small>WWW.GOOGLE.COM</small><a href="https://www.google.com">{cta}</a></div>
</div>
<div class="panel">
<h3 style="text-align: center">Upload to Social Media</h3>
<div class="social">"#,
        headline = html(preview.headline),
        body = html(preview.body),
        image = html(preview.image_url),
        cta = html(preview.cta_label),
    );
    for platform in SocialPlatform::ALL {
        let _ = write!(
            out,
            r#"<button type="button" data-platform="{}">{}</button>"#,
            platform.slug(),
            platform.name()
        );
    }
    out.push_str(
        r#"</div>
<form method="post" action="/reset"><button type="submit" class="secondary">Create a New Ad</button></form>
</div>"#,
    );
    out.push_str(UPLOAD);
    out
}

pub fn render_error(failure: &GenerationFailure) -> String {
    format!(
        r#"<div class="panel error">
<h2>An Error Occurred</h2>
<p>{}</p>
<form method="post" action="/reset"><button type="submit">Try Again</button></form>
</div>"#,
        html(&failure.message)
    )
}
