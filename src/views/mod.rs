//! Server-rendered pages.
//!
//! Every page shares [`page`] for its document shell. Pages are bilingual: Hindi
//! first, English in parentheses, as in the printed reporting form.

mod admin;
mod dashboard;
mod form;
mod landing;

pub use admin::*;
pub use dashboard::*;
pub use form::*;
pub use landing::*;

use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset, Utc};
use maud::{html, Markup, DOCTYPE};

/// India Standard Time, used for every displayed timestamp.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Document shell shared by every page.
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="hi" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | पर्यावरण गतिविधि" }
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="min-h-screen bg-gradient-to-br from-green-50 to-green-100 text-gray-900" {
                (body)
            }
        }
    }
}

/// Shown while a stored session is being renewed; reloads itself.
pub fn placeholder() -> Markup {
    html! {
        (DOCTYPE)
        html lang="hi" {
            head {
                meta charset="utf-8";
                meta http-equiv="refresh" content="2";
                title { "Loading..." }
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="min-h-screen flex items-center justify-center bg-green-100" {
                div class="text-center" id="session-loading" {
                    div class="inline-block animate-spin rounded-full h-16 w-16 border-b-4 border-green-600" {}
                    p class="mt-4 text-green-800 font-semibold" { "Loading..." }
                }
            }
        }
    }
}

pub fn error_page(status: StatusCode, code: &str, message: &str) -> Markup {
    page(
        "Error",
        html! {
            div class="max-w-xl mx-auto mt-24 bg-white rounded-xl shadow-lg p-8 border-t-4 border-red-500" {
                h1 class="text-2xl font-bold text-red-700 mb-2" {
                    "त्रुटि (Error) " (status.as_u16())
                }
                p class="text-gray-700" data-code=(code) { (message) }
                a href="/" class="inline-block mt-6 text-green-700 underline" { "मुखपृष्ठ (Home)" }
            }
        },
    )
}

/// Red banner used for every inline error.
pub(crate) fn error_banner(message: &str) -> Markup {
    html! {
        div class="mb-6 bg-red-50 border-l-4 border-red-500 text-red-700 p-4 rounded-lg" role="alert" {
            p class="font-semibold" { (message) }
        }
    }
}

/// Format a stored timestamp in IST, e.g. `19 Oct 2026, 02:30 PM`.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    let Some(ts) = ts else {
        return "N/A".to_string();
    };
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => ts.with_timezone(&ist).format("%d %b %Y, %I:%M %p").to_string(),
        None => ts.format("%d %b %Y, %I:%M %p UTC").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp_in_ist() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(Some(ts)), "19 Oct 2026, 02:30 PM");
        assert_eq!(format_timestamp(None), "N/A");
    }

    #[test]
    fn test_pages_escape_text() {
        let markup = error_page(StatusCode::BAD_GATEWAY, "BACKEND_ERROR", "<script>x</script>");
        let html = markup.into_string();
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("502"));
    }
}
