//! Admin login page.

use maud::{html, Markup, DOCTYPE};

use super::{error_banner, page};

#[derive(Debug, Clone, Default)]
pub struct AdminLoginView {
    pub username: String,
    pub error: Option<String>,
}

/// The password input is always rendered empty.
pub fn admin_login_page(view: &AdminLoginView) -> Markup {
    page(
        "Admin Login",
        html! {
            div class="min-h-screen flex items-center justify-center px-4 bg-gradient-to-br from-green-100 via-green-200 to-green-300" {
                div class="max-w-md w-full bg-white rounded-xl shadow-2xl p-8 border-t-4 border-green-600" {
                    div class="text-center mb-8" {
                        h1 class="text-3xl font-bold text-green-800 mb-2" { "Admin Login" }
                        p class="text-green-600" { "प्रशासक लॉगिन" }
                    }

                    @if let Some(error) = &view.error {
                        (error_banner(error))
                    }

                    form method="post" action="/admin" class="space-y-6" {
                        div {
                            label for="username" class="block text-green-800 font-semibold mb-2" { "Username" }
                            input id="username" name="username" type="text" required
                                value=(view.username)
                                placeholder="Enter admin username"
                                autocomplete="username"
                                class="w-full px-4 py-3 border border-green-300 rounded-lg";
                        }
                        div {
                            label for="password" class="block text-green-800 font-semibold mb-2" { "Password" }
                            input id="password" name="password" type="password" required
                                value=""
                                placeholder="Enter admin password"
                                autocomplete="current-password"
                                class="w-full px-4 py-3 border border-green-300 rounded-lg";
                        }
                        button type="submit" class="w-full bg-green-600 hover:bg-green-700 text-white font-bold py-3 rounded-lg" {
                            "Login"
                        }
                    }

                    p class="mt-6 text-center text-sm" {
                        a href="/" class="text-green-700 underline" { "← Back to Form" }
                    }
                }
            }
        },
    )
}

/// Interstitial after a successful admin login; moves on to `to` after one second.
pub fn redirecting_page(to: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="hi" {
            head {
                meta charset="utf-8";
                meta http-equiv="refresh" content=(format!("1;url={}", to));
                title { "Logging in..." }
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="min-h-screen flex items-center justify-center bg-green-100" {
                div class="text-center" {
                    div class="inline-block animate-spin rounded-full h-12 w-12 border-b-2 border-green-600" {}
                    p class="mt-4 text-green-800 font-semibold" {
                        "Logging in... "
                        a href=(to) class="underline" { "Continue" }
                    }
                }
            }
        }
    }
}
