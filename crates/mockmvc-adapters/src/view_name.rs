//! Default view names derived from the request path.

use mockmvc_core::application::ports::ViewNameTranslator;
use mockmvc_core::domain::MockRequest;

/// Derives `prefix + path + suffix` from the lookup path.
///
/// `/hotels/list.html` becomes `hotels/list`. The root path yields the empty
/// name, so with a prefix and suffix it becomes `prefix + suffix`.
#[derive(Debug, Clone)]
pub struct DefaultViewNameTranslator {
    prefix: String,
    suffix: String,
    strip_leading_slash: bool,
    strip_trailing_slash: bool,
    strip_extension: bool,
}

impl Default for DefaultViewNameTranslator {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            strip_leading_slash: true,
            strip_trailing_slash: true,
            strip_extension: true,
        }
    }
}

impl DefaultViewNameTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn strip_leading_slash(mut self, strip: bool) -> Self {
        self.strip_leading_slash = strip;
        self
    }

    pub fn strip_trailing_slash(mut self, strip: bool) -> Self {
        self.strip_trailing_slash = strip;
        self
    }

    pub fn strip_extension(mut self, strip: bool) -> Self {
        self.strip_extension = strip;
        self
    }

    fn transform(&self, path: &str) -> String {
        let mut name = path;
        if self.strip_leading_slash {
            name = name.strip_prefix('/').unwrap_or(name);
        }
        if self.strip_trailing_slash {
            name = name.strip_suffix('/').unwrap_or(name);
        }
        if self.strip_extension {
            let file_start = name.rfind('/').map_or(0, |i| i + 1);
            if let Some(dot) = name[file_start..].rfind('.') {
                name = &name[..file_start + dot];
            }
        }
        name.to_string()
    }
}

impl ViewNameTranslator for DefaultViewNameTranslator {
    fn view_name(&self, request: &MockRequest) -> Option<String> {
        let name = self.transform(&request.lookup_path());
        Some(format!("{}{}{}", self.prefix, name, self.suffix))
    }
}
