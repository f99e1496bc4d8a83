//! Public landing page: sign in or create an account.

use maud::{html, Markup};

use super::{error_banner, page};

/// Which of the two landing forms is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("signup") => AuthMode::SignUp,
            _ => AuthMode::SignIn,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            AuthMode::SignIn => "signin",
            AuthMode::SignUp => "signup",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LandingView {
    pub mode: AuthMode,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

pub fn landing_page(view: &LandingView) -> Markup {
    let signing_up = view.mode == AuthMode::SignUp;

    page(
        "Login",
        html! {
            div class="min-h-screen flex items-center justify-center px-4 bg-gradient-to-br from-green-100 via-green-200 to-green-300" {
                div class="max-w-md w-full bg-white rounded-xl shadow-2xl p-8 border-t-4 border-green-600" {
                    div class="text-center mb-8" {
                        h1 class="text-3xl font-bold text-green-800 mb-2" { "पर्यावरण गतिविधि" }
                        p class="text-green-600" {
                            @if signing_up { "नया खाता बनाएं (Create Account)" }
                            @else { "लॉगिन करें (Sign In)" }
                        }
                    }

                    @if let Some(notice) = &view.notice {
                        div class="mb-6 bg-green-50 border-l-4 border-green-500 text-green-800 p-4 rounded-lg" role="status" {
                            p { (notice) }
                        }
                    }
                    @if let Some(error) = &view.error {
                        (error_banner(error))
                    }

                    form method="post" action="/" class="space-y-6" {
                        input type="hidden" name="mode" value=(view.mode.as_param());
                        div {
                            label for="email" class="block text-sm font-medium text-gray-700 mb-2" { "Email" }
                            input id="email" name="email" type="email" required
                                value=(view.email)
                                placeholder="your.email@example.com"
                                autocomplete="email"
                                class="w-full px-4 py-3 border border-green-300 rounded-lg";
                        }
                        div {
                            label for="password" class="block text-sm font-medium text-gray-700 mb-2" { "Password" }
                            input id="password" name="password" type="password" required
                                placeholder="••••••••"
                                autocomplete=(if signing_up { "new-password" } else { "current-password" })
                                class="w-full px-4 py-3 border border-green-300 rounded-lg";
                        }
                        @if signing_up {
                            div {
                                label for="confirm_password" class="block text-sm font-medium text-gray-700 mb-2" { "Confirm Password" }
                                input id="confirm_password" name="confirm_password" type="password" required
                                    placeholder="••••••••"
                                    autocomplete="new-password"
                                    class="w-full px-4 py-3 border border-green-300 rounded-lg";
                            }
                        }
                        button type="submit" class="w-full bg-green-600 hover:bg-green-700 text-white font-bold py-3 rounded-lg" {
                            @if signing_up { "Sign Up" } @else { "Sign In" }
                        }
                    }

                    p class="mt-6 text-center text-sm text-gray-600" {
                        @if signing_up {
                            "Already have an account? "
                            a href="/" class="text-green-700 font-semibold underline" { "Sign In" }
                        } @else {
                            "Don't have an account? "
                            a href="/?mode=signup" class="text-green-700 font-semibold underline" { "Sign Up" }
                        }
                    }
                }
            }
        },
    )
}
