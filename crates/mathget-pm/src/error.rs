//! Category-coded error values
//!
//! Every fallible operation in this crate returns a plain [`Error`] value
//! rather than panicking. Each error belongs to one of seven categories,
//! each category owning a 4096-wide numeric code range; distinct kinds are
//! allocated the next free code in their category's range when the process
//! registers them. Errors render with their kind name, hex and decimal
//! code, a message wrapped at 80 columns, and a call-stack trace captured
//! at construction time.

use once_cell::sync::Lazy;
use std::backtrace::Backtrace;
use std::fmt;
use std::path::Path;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Width of each category's reserved code range.
const RANGE_WIDTH: u32 = 0x1000;

/// Maximum message line length before a break is inserted.
const WRAP_COLUMN: usize = 80;

/// The seven error categories, each with a reserved code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// 0x1000..=0x1FFF
    Network,
    /// 0x2000..=0x2FFF
    Package,
    /// 0x3000..=0x3FFF
    Dependency,
    /// 0x4000..=0x4FFF
    Filesystem,
    /// 0x5000..=0x5FFF
    User,
    /// 0x6000..=0x6FFF
    Internal,
    /// 0x7000..=0x7FFF
    System,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Network,
        Category::Package,
        Category::Dependency,
        Category::Filesystem,
        Category::User,
        Category::Internal,
        Category::System,
    ];

    /// Base code of the category's range. The base itself is reserved for
    /// the category and never assigned to a concrete kind.
    pub fn base(self) -> u32 {
        match self {
            Category::Network => 0x1000,
            Category::Package => 0x2000,
            Category::Dependency => 0x3000,
            Category::Filesystem => 0x4000,
            Category::User => 0x5000,
            Category::Internal => 0x6000,
            Category::System => 0x7000,
        }
    }

    /// Highest code available in the category's range.
    pub fn max_code(self) -> u32 {
        self.base() + RANGE_WIDTH - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Network => "Network",
            Category::Package => "Package",
            Category::Dependency => "Dependency",
            Category::Filesystem => "Filesystem",
            Category::User => "User",
            Category::Internal => "Internal",
            Category::System => "System",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Network => 0,
            Category::Package => 1,
            Category::Dependency => 2,
            Category::Filesystem => 3,
            Category::User => 4,
            Category::Internal => 5,
            Category::System => 6,
        }
    }
}

/// A registered error kind: its name, category, and allocated code.
#[derive(Debug, PartialEq, Eq)]
pub struct Kind {
    pub name: &'static str,
    pub category: Category,
    pub code: u32,
}

/// Allocator for per-category error codes.
///
/// Kinds are assigned codes starting at `base + 1` in registration order.
/// Exhausting a category's range is a configuration error and aborts the
/// process.
#[derive(Debug)]
pub struct Registry {
    next: [u32; Category::ALL.len()],
}

impl Registry {
    pub fn new() -> Self {
        let mut next = [0u32; Category::ALL.len()];
        for category in Category::ALL {
            next[category.index()] = category.base() + 1;
        }
        Self { next }
    }

    /// Registers a kind under a category and returns it with its code.
    ///
    /// # Panics
    ///
    /// Panics when the category's code range is exhausted.
    pub fn register(&mut self, category: Category, name: &'static str) -> Kind {
        let slot = &mut self.next[category.index()];
        let code = *slot;
        assert!(
            code <= category.max_code(),
            "no more error codes available for {} errors",
            category.name()
        );
        *slot = code + 1;
        Kind {
            name,
            category,
            code,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Every error kind the tool can produce.
///
/// Codes are allocated in field declaration order, once, on first access.
pub struct Kinds {
    pub network: Kind,
    pub http: Kind,
    pub package_not_found: Kind,
    pub package_metadata_not_found: Kind,
    pub io: Kind,
    pub invalid_command: Kind,
    pub invalid_arguments: Kind,
    pub internal: Kind,
    pub installation_not_found: Kind,
    pub file_or_directory_not_found: Kind,
    pub access_denied: Kind,
}

static KINDS: Lazy<Kinds> = Lazy::new(|| {
    let mut registry = Registry::new();
    Kinds {
        network: registry.register(Category::Network, "NetworkError"),
        http: registry.register(Category::Network, "HTTPError"),
        package_not_found: registry.register(Category::Package, "PackageNotFoundError"),
        package_metadata_not_found: registry
            .register(Category::Package, "PackageMetadataNotFoundError"),
        io: registry.register(Category::Filesystem, "IoError"),
        invalid_command: registry.register(Category::User, "InvalidCommandError"),
        invalid_arguments: registry.register(Category::User, "InvalidArgumentsError"),
        internal: registry.register(Category::Internal, "InternalError"),
        installation_not_found: registry.register(Category::System, "InstallationNotFoundError"),
        file_or_directory_not_found: registry
            .register(Category::System, "FileOrDirectoryNotFoundError"),
        access_denied: registry.register(Category::System, "AccesDeniedError"),
    }
});

/// The process-wide kind table.
pub fn kinds() -> &'static Kinds {
    &KINDS
}

/// A typed error value carrying its kind, wrapped message, and a call-stack
/// trace captured at construction.
#[derive(Debug)]
pub struct Error {
    kind: &'static Kind,
    message: String,
    trace: String,
}

impl Error {
    fn new(kind: &'static Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: wrap_message(&message.into()),
            trace: capture_trace(),
        }
    }

    pub fn kind(&self) -> &'static Kind {
        self.kind
    }

    pub fn code(&self) -> u32 {
        self.kind.code
    }

    pub fn category(&self) -> Category {
        self.kind.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is(&self, kind: &Kind) -> bool {
        self.kind.code == kind.code
    }

    /// Generic network failure (connection refused, timeout, ...).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(&kinds().network, message)
    }

    /// Non-success HTTP response. Unknown status codes render without a
    /// reason phrase instead of failing.
    pub fn http(status: u16) -> Self {
        let message = match reason_phrase(status) {
            Some(phrase) => format!("HTTP status code {status}: {phrase}."),
            None => format!("HTTP status code {status}: unrecognized status."),
        };
        Self::new(&kinds().http, message)
    }

    /// A package could not be located, optionally qualified with where it
    /// was looked for ("cached", "remote").
    pub fn package_not_found(package: &str, state: Option<&str>) -> Self {
        let message = match state {
            Some(state) => format!("Could not localize the {state} package \"{package}\"."),
            None => format!("Could not localize the package \"{package}\"."),
        };
        Self::new(&kinds().package_not_found, message)
    }

    pub fn package_metadata_not_found(package: &str) -> Self {
        Self::new(
            &kinds().package_metadata_not_found,
            format!("Could not localize metadata for the \"{package}\" package."),
        )
    }

    /// Filesystem operation failure with context.
    pub fn io(context: impl fmt::Display, source: &std::io::Error) -> Self {
        Self::new(&kinds().io, format!("{context}: {source}"))
    }

    pub fn invalid_command(command: &str) -> Self {
        Self::new(
            &kinds().invalid_command,
            format!("Invalid command: \"{command}\"."),
        )
    }

    /// Invalid or conflicting command arguments, naming each of them.
    pub fn invalid_arguments(arguments: &[&str]) -> Self {
        Self::new(
            &kinds().invalid_arguments,
            format!("Invalid argument: \"{}\".", arguments.join("\", \"")),
        )
    }

    /// Internal invariant violation; also the catch-all for parse failures
    /// that should not happen with well-formed inputs.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(&kinds().internal, message)
    }

    pub fn installation_not_found() -> Self {
        Self::new(
            &kinds().installation_not_found,
            "MathScript installation not found.",
        )
    }

    pub fn file_or_directory_not_found(path: &Path) -> Self {
        Self::new(
            &kinds().file_or_directory_not_found,
            format!(
                "Could not find the \"{}\" {}.",
                path.display(),
                path_noun(path)
            ),
        )
    }

    pub fn access_denied(path: &Path) -> Self {
        Self::new(
            &kinds().access_denied,
            format!(
                "The access to the {} \"{}\" is denied.",
                path_noun(path),
                path.display()
            ),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Error code: {:#x} [{}]):\n    {}\n\n{}",
            self.kind.name, self.kind.code, self.kind.code, self.message, self.trace
        )
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::new(&kinds().io, source.to_string())
    }
}

/// "directory" or "file", from the path's actual type on disk.
fn path_noun(path: &Path) -> &'static str {
    if path.is_dir() {
        "directory"
    } else {
        "file"
    }
}

/// Wraps each line of `message` at [`WRAP_COLUMN`] characters, breaking and
/// continuing on the next line. Existing line breaks are preserved.
fn wrap_message(message: &str) -> String {
    let mut wrapped = Vec::new();
    for line in message.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() <= WRAP_COLUMN {
            wrapped.push(line.to_string());
            continue;
        }
        let mut start = 0;
        while start < chars.len() {
            let end = (start + WRAP_COLUMN).min(chars.len());
            wrapped.push(chars[start..end].iter().collect());
            start = end;
        }
    }
    wrapped.join("\n")
}

/// Captures a textual call-stack trace, dropping this module's own frames
/// so the trace starts at the construction site.
fn capture_trace() -> String {
    let raw = Backtrace::force_capture().to_string();
    let mut kept = Vec::new();
    let mut skipping = false;
    for line in raw.lines() {
        let trimmed = line.trim_start();
        let header = trimmed
            .split_once(": ")
            .filter(|(index, _)| !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()));
        if let Some((_, symbol)) = header {
            skipping = symbol.contains("mathget_pm::error")
                || symbol.starts_with("std::backtrace");
        }
        if !skipping {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Standard HTTP reason phrases. Returns `None` for codes outside the
/// registry so callers never index a missing entry.
fn reason_phrase(status: u16) -> Option<&'static str> {
    Some(match status {
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        306 => "unused",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_codes_are_monotonic_within_category() {
        let mut registry = Registry::new();
        let first = registry.register(Category::Package, "FirstError");
        let second = registry.register(Category::Package, "SecondError");

        assert_eq!(first.code, 0x2001);
        assert_eq!(second.code, 0x2002);
        assert!(second.code > first.code);
    }

    #[test]
    fn test_categories_allocate_independently() {
        let mut registry = Registry::new();
        let network = registry.register(Category::Network, "A");
        let user = registry.register(Category::User, "B");

        assert_eq!(network.code, 0x1001);
        assert_eq!(user.code, 0x5001);
    }

    #[test]
    #[should_panic(expected = "no more error codes available")]
    fn test_exhausting_a_range_panics() {
        let mut registry = Registry::new();
        // base + 1 ..= base + 0xFFF leaves room for 4095 kinds.
        for _ in 0..RANGE_WIDTH {
            registry.register(Category::Dependency, "Overflow");
        }
    }

    #[test]
    fn test_registered_kind_table_is_deterministic() {
        let kinds = kinds();
        assert_eq!(kinds.network.code, 0x1001);
        assert_eq!(kinds.http.code, 0x1002);
        assert_eq!(kinds.package_not_found.code, 0x2001);
        assert_eq!(kinds.package_metadata_not_found.code, 0x2002);
        assert_eq!(kinds.internal.code, 0x6001);
        assert_eq!(kinds.access_denied.code, 0x7003);
    }

    #[test]
    fn test_wrap_splits_long_lines() {
        let message = "x".repeat(85);
        let wrapped = wrap_message(&message);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[1].len(), 5);
    }

    #[test]
    fn test_wrap_preserves_existing_breaks() {
        let message = format!("short\n{}", "y".repeat(90));
        let wrapped = wrap_message(&message);
        let lines: Vec<&str> = wrapped.lines().collect();
        assert_eq!(lines[0], "short");
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 10);
    }

    #[test]
    fn test_wrap_leaves_short_lines_alone() {
        assert_eq!(wrap_message("hello"), "hello");
    }

    #[test]
    fn test_http_error_known_status() {
        let err = Error::http(404);
        assert!(err.message().contains("HTTP status code 404: Not Found."));
        assert_eq!(err.category(), Category::Network);
    }

    #[test]
    fn test_http_error_unknown_status_does_not_panic() {
        let err = Error::http(799);
        assert!(err.message().contains("799"));
        assert!(err.message().contains("unrecognized"));
    }

    #[test]
    fn test_package_not_found_state_wording() {
        let plain = Error::package_not_found("demo", None);
        assert_eq!(
            plain.message(),
            "Could not localize the package \"demo\"."
        );

        let cached = Error::package_not_found("demo", Some("cached"));
        assert_eq!(
            cached.message(),
            "Could not localize the cached package \"demo\"."
        );
    }

    #[test]
    fn test_invalid_arguments_joins_names() {
        let err = Error::invalid_arguments(&["package", "-r/--requirements"]);
        assert_eq!(
            err.message(),
            "Invalid argument: \"package\", \"-r/--requirements\"."
        );
    }

    #[test]
    fn test_missing_path_reports_file_wording() {
        let err = Error::file_or_directory_not_found(&PathBuf::from("/no/such/entry"));
        assert!(err.message().contains("file"));
        assert!(!err.message().contains("directory"));
    }

    #[test]
    fn test_display_includes_codes_and_message() {
        let err = Error::invalid_command("frobnicate");
        let rendered = err.to_string();
        assert!(rendered.starts_with("InvalidCommandError (Error code: 0x5001 [20481]):"));
        assert!(rendered.contains("Invalid command: \"frobnicate\"."));
    }
}
