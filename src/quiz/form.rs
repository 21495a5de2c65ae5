//! Sign-in and sign-up form, typed into one field at a time.

use crate::error::QuizError;

use super::accounts::{Accounts, UserRecord};

pub const FIELD_MAX_CHARS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    SignIn,
    SignUp,
}

struct Field {
    label: &'static str,
    secret: bool,
}

const SIGN_IN_FIELDS: [Field; 2] = [
    Field {
        label: "Email",
        secret: false,
    },
    Field {
        label: "Password",
        secret: true,
    },
];

const SIGN_UP_FIELDS: [Field; 4] = [
    Field {
        label: "Name",
        secret: false,
    },
    Field {
        label: "Email",
        secret: false,
    },
    Field {
        label: "Password",
        secret: true,
    },
    Field {
        label: "Confirm",
        secret: true,
    },
];

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            FormMode::SignIn => "Sign in",
            FormMode::SignUp => "Sign up",
        }
    }

    pub fn other(self) -> Self {
        match self {
            FormMode::SignIn => FormMode::SignUp,
            FormMode::SignUp => FormMode::SignIn,
        }
    }

    fn fields(self) -> &'static [Field] {
        match self {
            FormMode::SignIn => &SIGN_IN_FIELDS,
            FormMode::SignUp => &SIGN_UP_FIELDS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountForm {
    pub mode: FormMode,
    values: Vec<String>,
    pub focus: usize,
    /// Message from the last rejected submit.
    pub error: Option<String>,
}

impl AccountForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            values: vec![String::new(); mode.fields().len()],
            focus: 0,
            error: None,
        }
    }

    pub fn field_count(&self) -> usize {
        self.values.len()
    }

    pub fn label(&self, index: usize) -> &'static str {
        self.mode.fields()[index].label
    }

    /// Field text as drawn; secret fields are masked.
    pub fn shown_value(&self, index: usize) -> String {
        let value = &self.values[index];
        if self.mode.fields()[index].secret {
            "*".repeat(value.chars().count())
        } else {
            value.clone()
        }
    }

    pub fn switch_mode(&mut self) {
        *self = Self::new(self.mode.other());
    }

    pub fn type_char(&mut self, c: char) -> bool {
        let value = &mut self.values[self.focus];
        if c.is_control() || value.chars().count() >= FIELD_MAX_CHARS {
            return false;
        }
        value.push(c);
        self.error = None;
        true
    }

    pub fn erase(&mut self) -> bool {
        self.values[self.focus].pop().is_some()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.values.len();
    }

    pub fn focus_field(&mut self, index: usize) -> bool {
        if index < self.values.len() {
            self.focus = index;
            true
        } else {
            false
        }
    }

    pub fn on_last_field(&self) -> bool {
        self.focus + 1 == self.values.len()
    }

    /// Sign in or register with the typed values. On failure the reason is
    /// kept in `error` and the form stays open.
    pub fn submit(&mut self, accounts: &Accounts, now_ms: f64) -> Option<UserRecord> {
        let v = &self.values;
        let outcome = if v.iter().any(|value| value.trim().is_empty()) {
            Err(QuizError::EmptyFields)
        } else {
            match self.mode {
                FormMode::SignIn => accounts.log_in(v[0].trim(), &v[1], now_ms),
                FormMode::SignUp => accounts.sign_up(&v[0], v[1].trim(), &v[2], &v[3], now_ms),
            }
        };
        match outcome {
            Ok(user) => Some(user),
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::rc::Rc;

    fn fill(form: &mut AccountForm, values: &[&str]) {
        for (i, value) in values.iter().enumerate() {
            form.focus_field(i);
            for c in value.chars() {
                form.type_char(c);
            }
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = AccountForm::new(FormMode::SignIn);
        fill(&mut form, &["a@x.io", "Pw"]);
        assert_eq!(form.shown_value(0), "a@x.io");
        assert_eq!(form.shown_value(1), "**");
        assert!(form.erase());
        assert_eq!(form.shown_value(1), "*");
    }

    #[test]
    fn focus_wraps_and_rejects_out_of_range() {
        let mut form = AccountForm::new(FormMode::SignUp);
        assert_eq!(form.field_count(), 4);
        for _ in 0..3 {
            form.focus_next();
        }
        assert!(form.on_last_field());
        assert_eq!(form.label(form.focus), "Confirm");
        form.focus_next();
        assert_eq!(form.focus, 0);
        assert!(!form.focus_field(4));
    }

    #[test]
    fn control_chars_and_overlong_input_are_ignored() {
        let mut form = AccountForm::new(FormMode::SignIn);
        assert!(!form.type_char('\t'));
        for _ in 0..FIELD_MAX_CHARS {
            assert!(form.type_char('a'));
        }
        assert!(!form.type_char('a'));
    }

    #[test]
    fn sign_up_then_sign_in() {
        let accounts = Accounts::new(Rc::new(MemoryStore::new()));
        let mut form = AccountForm::new(FormMode::SignUp);
        fill(&mut form, &["Asha Rao", "asha@example.com", "Secret", "Secret"]);
        let user = form.submit(&accounts, 1.0).unwrap();
        assert_eq!(user.name, "Asha Rao");

        accounts.log_out();
        form.switch_mode();
        assert_eq!(form.mode, FormMode::SignIn);
        fill(&mut form, &["asha@example.com", "Secret"]);
        assert_eq!(form.submit(&accounts, 2.0).map(|u| u.last_login_ms), Some(2.0));
    }

    #[test]
    fn rejected_submit_keeps_reason() {
        let accounts = Accounts::new(Rc::new(MemoryStore::new()));
        let mut form = AccountForm::new(FormMode::SignIn);
        fill(&mut form, &["asha@example.com"]);
        assert!(form.submit(&accounts, 0.0).is_none());
        assert_eq!(form.error.as_deref(), Some("Please fill in all fields."));

        form.focus_field(1);
        for c in "nope".chars() {
            form.type_char(c);
        }
        assert!(form.submit(&accounts, 0.0).is_none());
        assert_eq!(form.error.as_deref(), Some("Invalid email or password"));
        // typing clears the message
        form.type_char('x');
        assert!(form.error.is_none());
    }
}
