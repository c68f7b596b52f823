use std::fmt;

/// The protocol domains devbridge has bindings for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Domain {
    Animation,
    Browser,
    Database,
    Debugger,
    Dom,
    DomSnapshot,
    HeapProfiler,
    IndexedDb,
    LayerTree,
    Page,
    Profiler,
    Runtime,
    ServiceWorker,
    Target,
    /// A domain without bindings, by its wire name.
    Unknown(String),
}

impl Domain {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Animation" => Domain::Animation,
            "Browser" => Domain::Browser,
            "Database" => Domain::Database,
            "Debugger" => Domain::Debugger,
            "DOM" => Domain::Dom,
            "DOMSnapshot" => Domain::DomSnapshot,
            "HeapProfiler" => Domain::HeapProfiler,
            "IndexedDB" => Domain::IndexedDb,
            "LayerTree" => Domain::LayerTree,
            "Page" => Domain::Page,
            "Profiler" => Domain::Profiler,
            "Runtime" => Domain::Runtime,
            "ServiceWorker" => Domain::ServiceWorker,
            "Target" => Domain::Target,
            other => Domain::Unknown(other.to_string()),
        }
    }

    /// Domain of a `"Domain.name"` method. A method without a dot is taken
    /// whole as the domain name.
    pub fn of_method(method: &str) -> Self {
        let name = crate::split_method(method).map_or(method, |(domain, _)| domain);
        Self::from_name(name)
    }

    pub fn name(&self) -> &str {
        match self {
            Domain::Animation => "Animation",
            Domain::Browser => "Browser",
            Domain::Database => "Database",
            Domain::Debugger => "Debugger",
            Domain::Dom => "DOM",
            Domain::DomSnapshot => "DOMSnapshot",
            Domain::HeapProfiler => "HeapProfiler",
            Domain::IndexedDb => "IndexedDB",
            Domain::LayerTree => "LayerTree",
            Domain::Page => "Page",
            Domain::Profiler => "Profiler",
            Domain::Runtime => "Runtime",
            Domain::ServiceWorker => "ServiceWorker",
            Domain::Target => "Target",
            Domain::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
