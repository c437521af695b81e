//! Login and registration pages.

use maud::{html, Markup, Render};

use crate::components::{Alert, BaseLayout, Form, FormGroup, Input};
use crate::controllers::{FieldErrors, LoginForm, RegisterForm};

fn field<'a>(
    errors: &'a FieldErrors,
    label: &'a str,
    name: &'a str,
    input: Input<'a>,
) -> FormGroup<'a> {
    let error = errors.get(name).copied();
    FormGroup::new(label, name, input.id(name).invalid(error.is_some()).render()).error(error)
}

/// Render the login page, refilling the email after a failed attempt.
#[must_use]
pub fn render_login_page(form: &LoginForm, errors: &FieldErrors, message: Option<&str>) -> Markup {
    let fields = html! {
        (field(errors, "Email", "email",
            Input::email("email").value(&form.email).placeholder("Enter your email").autocomplete("email")))
        (field(errors, "Password", "password",
            Input::password("password").placeholder("Enter your password").autocomplete("current-password")))
        button type="submit" class="button primary" { "Login" }
    };

    let content = html! {
        section class="auth-card" {
            h1 { "Sign In" }
            @if let Some(message) = message {
                (Alert::error(message))
            }
            (Form::post("/login", fields))
            p class="auth-switch" {
                "Don't have an account? " a href="/register" { "Register" }
            }
        }
    };

    BaseLayout::new("Login", None).render(content)
}

/// Render the registration page. Passwords are never echoed back.
#[must_use]
pub fn render_register_page(
    form: &RegisterForm,
    errors: &FieldErrors,
    message: Option<&str>,
) -> Markup {
    let fields = html! {
        (field(errors, "Name", "name",
            Input::text("name").value(&form.name).placeholder("Enter your name").autocomplete("name")))
        (field(errors, "Email", "email",
            Input::email("email").value(&form.email).placeholder("Enter your email").autocomplete("email")))
        (field(errors, "Password", "password",
            Input::password("password").placeholder("Enter your password").autocomplete("new-password")))
        (field(errors, "Confirm Password", "confirm_password",
            Input::password("confirm_password").placeholder("Enter your confirm password").autocomplete("new-password")))
        button type="submit" class="button primary" { "Register" }
    };

    let content = html! {
        section class="auth-card" {
            h1 { "Sign Up" }
            @if let Some(message) = message {
                (Alert::error(message))
            }
            (Form::post("/register", fields))
            p class="auth-switch" {
                "Already have an account? " a href="/login" { "Log in" }
            }
        }
    };

    BaseLayout::new("Register", None).render(content)
}
