/// Username entry: the text value plus a flag set once the form is submitted.
///
/// No validation happens here; an empty or malformed username is passed on
/// unchanged and left for the fetch to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm {
    username: String,
    submitted: bool,
}

impl QueryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Replace the whole text value.
    pub fn input(&mut self, value: &str) {
        self.username = value.to_string();
    }

    pub fn push_char(&mut self, c: char) {
        self.username.push(c);
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.username.pop()
    }

    /// Mark the form submitted and hand back the current value.
    pub fn submit(&mut self) -> String {
        self.submitted = true;
        self.username.clone()
    }

    pub fn should_show_results(&self) -> bool {
        self.submitted
    }
}
