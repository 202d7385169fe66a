//! Built-in environments and the globals each one defines

use serde_json::Value;

use crate::config::{GlobalAccess, integral};

use GlobalAccess::{Readonly as R, Writable as W};

/// A named bundle of predefined globals
#[derive(Debug)]
pub struct Environment {
    pub name: &'static str,
    /// Environment whose globals this one includes
    pub extends: Option<&'static str>,
    pub globals: &'static [(&'static str, GlobalAccess)],
}

impl Environment {
    /// Globals of this environment including inherited ones, parents first
    pub fn all_globals(&self) -> Vec<(&'static str, GlobalAccess)> {
        let mut globals = self
            .extends
            .and_then(lookup)
            .map(Environment::all_globals)
            .unwrap_or_default();
        globals.extend_from_slice(self.globals);
        globals
    }
}

/// Newest ECMAScript edition with a globals bundle
pub const LATEST_ECMA_YEAR: u64 = 2025;

static ENVIRONMENTS: &[Environment] = &[
    Environment {
        name: "browser",
        extends: None,
        globals: &[
            ("window", R),
            ("self", R),
            ("document", R),
            ("navigator", R),
            ("location", W),
            ("history", R),
            ("console", R),
            ("localStorage", R),
            ("sessionStorage", R),
            ("fetch", R),
            ("setTimeout", R),
            ("clearTimeout", R),
            ("setInterval", R),
            ("clearInterval", R),
            ("requestAnimationFrame", R),
            ("cancelAnimationFrame", R),
            ("queueMicrotask", R),
            ("alert", R),
            ("confirm", R),
            ("prompt", R),
            ("performance", R),
            ("crypto", R),
            ("XMLHttpRequest", R),
            ("WebSocket", R),
            ("Worker", R),
            ("HTMLElement", R),
            ("Element", R),
            ("Node", R),
            ("Event", R),
            ("CustomEvent", R),
            ("URL", R),
            ("URLSearchParams", R),
            ("Blob", R),
            ("File", R),
            ("FormData", R),
            ("Headers", R),
            ("Request", R),
            ("Response", R),
            ("TextEncoder", R),
            ("TextDecoder", R),
            ("onload", W),
            ("onerror", W),
        ],
    },
    Environment {
        name: "node",
        extends: None,
        globals: &[
            ("process", R),
            ("Buffer", R),
            ("__dirname", R),
            ("__filename", R),
            ("require", R),
            ("module", R),
            ("exports", W),
            ("global", R),
            ("console", R),
            ("setTimeout", R),
            ("clearTimeout", R),
            ("setInterval", R),
            ("clearInterval", R),
            ("setImmediate", R),
            ("clearImmediate", R),
            ("queueMicrotask", R),
            ("structuredClone", R),
            ("URL", R),
            ("URLSearchParams", R),
            ("TextEncoder", R),
            ("TextDecoder", R),
            ("AbortController", R),
        ],
    },
    Environment {
        name: "commonjs",
        extends: None,
        globals: &[
            ("exports", W),
            ("global", R),
            ("module", R),
            ("require", R),
        ],
    },
    Environment {
        name: "shared-node-browser",
        extends: None,
        globals: &[
            ("console", R),
            ("setTimeout", R),
            ("clearTimeout", R),
            ("setInterval", R),
            ("clearInterval", R),
            ("queueMicrotask", R),
            ("URL", R),
            ("URLSearchParams", R),
            ("TextEncoder", R),
            ("TextDecoder", R),
        ],
    },
    Environment {
        name: "worker",
        extends: None,
        globals: &[
            ("self", R),
            ("postMessage", R),
            ("importScripts", R),
            ("close", R),
            ("onmessage", W),
            ("onerror", W),
            ("console", R),
            ("fetch", R),
            ("setTimeout", R),
            ("clearTimeout", R),
            ("setInterval", R),
            ("clearInterval", R),
        ],
    },
    Environment {
        name: "serviceworker",
        extends: Some("worker"),
        globals: &[
            ("caches", R),
            ("clients", R),
            ("registration", R),
            ("skipWaiting", R),
            ("onfetch", W),
            ("oninstall", W),
            ("onactivate", W),
        ],
    },
    Environment {
        name: "jest",
        extends: None,
        globals: &[
            ("describe", R),
            ("fdescribe", R),
            ("xdescribe", R),
            ("it", R),
            ("fit", R),
            ("xit", R),
            ("test", R),
            ("xtest", R),
            ("expect", R),
            ("beforeAll", R),
            ("beforeEach", R),
            ("afterAll", R),
            ("afterEach", R),
            ("jest", R),
            ("pit", R),
            ("require", R),
        ],
    },
    Environment {
        name: "mocha",
        extends: None,
        globals: &[
            ("describe", R),
            ("xdescribe", R),
            ("context", R),
            ("xcontext", R),
            ("it", R),
            ("xit", R),
            ("specify", R),
            ("xspecify", R),
            ("before", R),
            ("after", R),
            ("beforeEach", R),
            ("afterEach", R),
            ("suite", R),
            ("test", R),
            ("setup", R),
            ("teardown", R),
            ("suiteSetup", R),
            ("suiteTeardown", R),
            ("mocha", R),
            ("run", R),
        ],
    },
    Environment {
        name: "jasmine",
        extends: None,
        globals: &[
            ("describe", R),
            ("fdescribe", R),
            ("xdescribe", R),
            ("it", R),
            ("fit", R),
            ("xit", R),
            ("expect", R),
            ("expectAsync", R),
            ("beforeAll", R),
            ("beforeEach", R),
            ("afterAll", R),
            ("afterEach", R),
            ("fail", R),
            ("pending", R),
            ("spyOn", R),
            ("spyOnProperty", R),
            ("jasmine", R),
        ],
    },
    Environment {
        name: "jquery",
        extends: None,
        globals: &[("$", R), ("jQuery", R)],
    },
    Environment {
        name: "amd",
        extends: None,
        globals: &[("define", R), ("require", R)],
    },
    Environment {
        name: "es6",
        extends: Some("es2015"),
        globals: &[],
    },
    Environment {
        name: "es2015",
        extends: None,
        globals: &[
            ("Map", R),
            ("Set", R),
            ("WeakMap", R),
            ("WeakSet", R),
            ("Promise", R),
            ("Proxy", R),
            ("Reflect", R),
            ("Symbol", R),
            ("ArrayBuffer", R),
            ("DataView", R),
            ("Int8Array", R),
            ("Uint8Array", R),
            ("Uint8ClampedArray", R),
            ("Int16Array", R),
            ("Uint16Array", R),
            ("Int32Array", R),
            ("Uint32Array", R),
            ("Float32Array", R),
            ("Float64Array", R),
        ],
    },
    Environment {
        name: "es2016",
        extends: Some("es2015"),
        globals: &[],
    },
    Environment {
        name: "es2017",
        extends: Some("es2016"),
        globals: &[("Atomics", R), ("SharedArrayBuffer", R)],
    },
    Environment {
        name: "es2018",
        extends: Some("es2017"),
        globals: &[],
    },
    Environment {
        name: "es2019",
        extends: Some("es2018"),
        globals: &[],
    },
    Environment {
        name: "es2020",
        extends: Some("es2019"),
        globals: &[
            ("BigInt", R),
            ("BigInt64Array", R),
            ("BigUint64Array", R),
            ("globalThis", R),
        ],
    },
    Environment {
        name: "es2021",
        extends: Some("es2020"),
        globals: &[
            ("AggregateError", R),
            ("FinalizationRegistry", R),
            ("WeakRef", R),
        ],
    },
    Environment {
        name: "es2022",
        extends: Some("es2021"),
        globals: &[],
    },
    Environment {
        name: "es2023",
        extends: Some("es2022"),
        globals: &[],
    },
    Environment {
        name: "es2024",
        extends: Some("es2023"),
        globals: &[],
    },
    Environment {
        name: "es2025",
        extends: Some("es2024"),
        globals: &[("Iterator", R)],
    },
];

/// Find an environment by name
pub fn lookup(name: &str) -> Option<&'static Environment> {
    ENVIRONMENTS.iter().find(|env| env.name == name)
}

/// Names of every known environment
pub fn names() -> impl Iterator<Item = &'static str> {
    ENVIRONMENTS.iter().map(|env| env.name)
}

/// Globals bundle implied by `parserOptions.ecmaVersion`
///
/// `3` and `5` are recognised but predate the bundles. Unrecognised values
/// imply nothing.
pub fn for_ecma_version(version: &Value) -> Option<&'static Environment> {
    let year = match version {
        Value::String(token) if token == "latest" => LATEST_ECMA_YEAR,
        Value::Number(number) => match integral(number)? {
            3 | 5 => return None,
            edition @ 6..=16 => 2009 + edition,
            year @ 2015..=LATEST_ECMA_YEAR => year,
            _ => return None,
        },
        _ => return None,
    };
    lookup(&format!("es{year}"))
}
