//! Form components for maud templates.
//!
//! These match the styles defined in `static/css/style.css`.

use maud::{html, Markup, Render};

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    /// Form action URL
    pub action: &'a str,
    /// HTTP method ("get" or "post")
    pub method: &'a str,
    pub content: Markup,
    pub class: Option<&'a str>,
}

impl<'a> Form<'a> {
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            class: None,
        }
    }

    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    #[must_use]
    pub fn get(action: &'a str, content: Markup) -> Self {
        Self::new(action, "get", content)
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form action=(self.action) method=(self.method) class=[self.class] {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    pub name: &'a str,
    /// Input type ("text", "password", "email", "search", "hidden")
    pub r#type: &'a str,
    pub value: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    pub id: Option<&'a str>,
    pub autocomplete: Option<&'a str>,
    pub invalid: bool,
}

impl<'a> Input<'a> {
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            id: None,
            autocomplete: None,
            invalid: false,
        }
    }

    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    #[must_use]
    pub fn password(name: &'a str) -> Self {
        Self::new(name, "password")
    }

    #[must_use]
    pub fn email(name: &'a str) -> Self {
        Self::new(name, "email")
    }

    #[must_use]
    pub fn search(name: &'a str) -> Self {
        Self::new(name, "search")
    }

    #[must_use]
    pub fn hidden(name: &'a str, value: &'a str) -> Self {
        Self::new(name, "hidden").value(value)
    }

    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn id(mut self, id: &'a str) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn autocomplete(mut self, autocomplete: &'a str) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }

    /// Mark the field as failing validation.
    #[must_use]
    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                id=[self.id]
                autocomplete=[self.autocomplete]
                aria-invalid=[self.invalid.then_some("true")];
        }
    }
}

/// A textarea element.
#[derive(Debug, Clone)]
pub struct TextArea<'a> {
    pub name: &'a str,
    pub placeholder: Option<&'a str>,
    pub rows: Option<u32>,
    pub disabled: bool,
}

impl<'a> TextArea<'a> {
    #[must_use]
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            placeholder: None,
            rows: None,
            disabled: false,
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea
                name=(self.name)
                placeholder=[self.placeholder]
                rows=[self.rows]
                disabled[self.disabled] {}
        }
    }
}

/// Label, input and an optional validation message.
#[derive(Debug)]
pub struct FormGroup<'a> {
    pub label: &'a str,
    /// Input ID (also used for the label's `for` attribute)
    pub id: &'a str,
    pub input: Markup,
    pub error: Option<&'a str>,
}

impl<'a> FormGroup<'a> {
    #[must_use]
    pub fn new(label: &'a str, id: &'a str, input: Markup) -> Self {
        Self {
            label,
            id,
            input,
            error: None,
        }
    }

    #[must_use]
    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="form-group" {
                label for=(self.id) { (self.label) }
                (self.input)
                @if let Some(error) = self.error {
                    small class="field-error" { (error) }
                }
            }
        }
    }
}
