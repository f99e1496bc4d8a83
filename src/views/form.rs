//! The activity report form and its success overlay.

use maud::{html, Markup};

use super::{error_banner, page};
use crate::models::{CompletedBy, Field, FieldErrors, SubmissionInput};

#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub user_email: Option<String>,
    pub input: SubmissionInput,
    pub errors: FieldErrors,
    pub alert: Option<String>,
    pub submitted: bool,
}

const INPUT_CLASS: &str =
    "w-full px-4 py-3 border border-green-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-green-500";

pub fn form_page(view: &FormView) -> Markup {
    page(
        "Activity Form",
        html! {
            @if view.submitted {
                (success_overlay())
            }
            div class="max-w-3xl mx-auto py-8 px-4" {
                div class="flex justify-between items-center mb-6" {
                    @if let Some(email) = &view.user_email {
                        span class="text-sm text-green-800" { "Logged in as " strong { (email) } }
                    }
                    form method="post" action="/logout" {
                        button type="submit" class="text-sm bg-white border border-green-400 text-green-700 px-4 py-2 rounded-lg" {
                            "लॉगआउट (Logout)"
                        }
                    }
                }

                div class="bg-white rounded-xl shadow-lg p-8 border-t-4 border-green-600" {
                    h1 class="text-3xl font-bold text-green-800 text-center mb-2" { "गतिविधि प्रस्तुति फॉर्म" }
                    p class="text-center text-green-600 mb-8" { "Activity Submission Form" }

                    @if let Some(alert) = &view.alert {
                        (error_banner(alert))
                    }

                    form method="post" action="/form" class="space-y-6" {
                        (text_field(view, Field::District, "district", "जिला (District)", "अपना जिला दर्ज करें", &view.input.district))
                        (text_field(view, Field::Place, "place", "स्थान (Place)", "स्थान का नाम दर्ज करें", &view.input.place))

                        div {
                            label for="completed_by" class="block text-green-800 font-semibold mb-2" {
                                "कार्य सम्पन्न (Completed By) " span class="text-red-500" { "*" }
                            }
                            select id="completed_by" name="completed_by" required class=(INPUT_CLASS) {
                                option value="" { "-- चुनें --" }
                                @for category in CompletedBy::ALL {
                                    option value=(category.as_str())
                                        selected[view.input.completed_by == category.as_str()] {
                                        (category.as_str()) " (" (category.english()) ")"
                                    }
                                }
                            }
                            (field_error(view, Field::CompletedBy))
                        }

                        (text_area(view, Field::WorkDescription, "work_description", "कार्य का विवरण (Work Description)", "कार्य का विस्तृत विवरण लिखें...", &view.input.work_description))
                        (text_area(view, Field::Result, "result", "परिणाम (Result)", "कार्य के परिणाम का विवरण लिखें...", &view.input.result))

                        div {
                            label for="google_drive_link" class="block text-green-800 font-semibold mb-2" { "चित्र (Google Drive Link)" }
                            input id="google_drive_link" name="google_drive_link" type="url"
                                value=(view.input.google_drive_link)
                                placeholder="https://drive.google.com/..."
                                class=(INPUT_CLASS);
                            p class="text-sm text-green-600 mt-1" {
                                "कृपया Google Drive से शेयर की गई लिंक यहाँ पेस्ट करें (वैकल्पिक)"
                            }
                            (field_error(view, Field::GoogleDriveLink))
                        }

                        div class="pt-4" {
                            button type="submit" class="w-full bg-green-600 hover:bg-green-700 text-white font-bold py-4 rounded-lg" {
                                "फॉर्म सबमिट करें (Submit Form)"
                            }
                        }
                    }

                    p class="mt-6 text-center text-sm text-green-700" {
                        "सभी आवश्यक फील्ड (" span class="text-red-500" { "*" } ") भरें।"
                    }
                }
            }
        },
    )
}

fn success_overlay() -> Markup {
    html! {
        div id="success-overlay" class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50 p-4" {
            div class="bg-white rounded-2xl shadow-2xl p-8 max-w-md w-full text-center" {
                h2 class="text-3xl font-bold text-green-700 mb-4" { "सफलता! Success!" }
                p class="text-gray-700 mb-6" { "आपका फॉर्म सफलतापूर्वक सबमिट हो गया है।" }
                p class="text-3xl mb-6" { "🌱 🌿 🌳" }
                a href="/form" class="inline-block bg-green-600 hover:bg-green-700 text-white font-bold py-3 px-8 rounded-lg" {
                    "बंद करें (Close)"
                }
            }
        }
    }
}

fn text_field(view: &FormView, field: Field, name: &str, label: &str, placeholder: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(name) class="block text-green-800 font-semibold mb-2" {
                (label) " " span class="text-red-500" { "*" }
            }
            input id=(name) name=(name) type="text" required value=(value) placeholder=(placeholder) class=(INPUT_CLASS);
            (field_error(view, field))
        }
    }
}

fn text_area(view: &FormView, field: Field, name: &str, label: &str, placeholder: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(name) class="block text-green-800 font-semibold mb-2" {
                (label) " " span class="text-red-500" { "*" }
            }
            textarea id=(name) name=(name) rows="5" required placeholder=(placeholder) class=(INPUT_CLASS) { (value) }
            (field_error(view, field))
        }
    }
}

fn field_error(view: &FormView, field: Field) -> Markup {
    html! {
        @if let Some(message) = view.errors.get(&field) {
            p class="text-red-500 text-sm mt-1 field-error" { (message) }
        }
    }
}
