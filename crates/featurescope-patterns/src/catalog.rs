//! Built-in detection catalog
//!
//! Ids follow the dataset keys where one exists, so most patterns resolve to a
//! feature record directly. Relationship targets are pattern ids or aliases.

use crate::models::{PatternCategory, RiskLevel};

/// Static description of a pattern, compiled into a
/// [`PatternDefinition`](crate::PatternDefinition) by the registry
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    /// Primary id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Alternate keys
    pub aliases: &'static [&'static str],
    /// Detection expressions
    pub regexes: &'static [&'static str],
    /// Source kind
    pub category: PatternCategory,
    /// Curated risk
    pub risk_level: RiskLevel,
    /// Safer replacements
    pub alternatives: &'static [&'static str],
    /// Upgrade target
    pub upgrade_to: Option<&'static str>,
    /// Companions
    pub complementary: &'static [&'static str],
    /// Replaced features
    pub supersedes: &'static [&'static str],
}

const CSS: PatternSpec = PatternSpec {
    id: "",
    name: "",
    aliases: &[],
    regexes: &[],
    category: PatternCategory::Css,
    risk_level: RiskLevel::Safe,
    alternatives: &[],
    upgrade_to: None,
    complementary: &[],
    supersedes: &[],
};

const JS: PatternSpec = PatternSpec {
    category: PatternCategory::Js,
    ..CSS
};

const API: PatternSpec = PatternSpec {
    category: PatternCategory::Api,
    ..CSS
};

const HTML: PatternSpec = PatternSpec {
    category: PatternCategory::Html,
    ..CSS
};

/// Every built-in pattern
pub static BUILTIN_PATTERNS: &[PatternSpec] = &[
    // Layout
    PatternSpec {
        id: "grid",
        name: "CSS Grid",
        aliases: &["css-grid", "grid-layout"],
        regexes: &[
            r"display\s*:\s*(?:inline-)?grid\b",
            r"grid-template-(?:columns|rows|areas)\s*:",
        ],
        complementary: &["gap", "subgrid"],
        supersedes: &["float"],
        ..CSS
    },
    PatternSpec {
        id: "subgrid",
        name: "Subgrid",
        aliases: &["css-subgrid"],
        regexes: &[r"\bsubgrid\b"],
        risk_level: RiskLevel::Moderate,
        alternatives: &["grid"],
        complementary: &["gap"],
        ..CSS
    },
    PatternSpec {
        id: "flexbox",
        name: "Flexbox",
        aliases: &["css-flexbox", "flex"],
        regexes: &[r"display\s*:\s*(?:inline-)?flex\b"],
        complementary: &["gap"],
        supersedes: &["float"],
        ..CSS
    },
    PatternSpec {
        id: "gap",
        name: "Gap",
        aliases: &["flexbox-gap", "grid-gap", "css-gap"],
        regexes: &[r"\b(?:row-|column-)?gap\s*:"],
        complementary: &["flexbox", "grid"],
        ..CSS
    },
    PatternSpec {
        id: "container-queries",
        name: "Container queries",
        aliases: &["css-container-queries", "container-query"],
        regexes: &[
            r"@container\b",
            r"container-(?:type|name)\s*:",
            r"\d(?:cqw|cqh|cqi|cqb|cqmin|cqmax)\b",
        ],
        risk_level: RiskLevel::Moderate,
        alternatives: &["media-queries"],
        complementary: &["grid", "flexbox"],
        supersedes: &["media-queries"],
        ..CSS
    },
    PatternSpec {
        id: "media-queries",
        name: "Media queries",
        aliases: &["css-media-queries", "mediaqueries"],
        regexes: &[r"@media\b"],
        upgrade_to: Some("container-queries"),
        ..CSS
    },
    PatternSpec {
        id: "aspect-ratio",
        name: "aspect-ratio",
        aliases: &["css-aspect-ratio"],
        regexes: &[r"\baspect-ratio\s*:"],
        ..CSS
    },
    PatternSpec {
        id: "float",
        name: "Float layout",
        aliases: &["css-float"],
        regexes: &[r"\bfloat\s*:\s*(?:left|right)\b"],
        upgrade_to: Some("flexbox"),
        ..CSS
    },
    PatternSpec {
        id: "sticky-positioning",
        name: "Sticky positioning",
        aliases: &["sticky", "position-sticky"],
        regexes: &[r"position\s*:\s*sticky\b"],
        ..CSS
    },
    PatternSpec {
        id: "anchor-positioning",
        name: "Anchor positioning",
        aliases: &["css-anchor-positioning"],
        regexes: &[
            r"\banchor-name\s*:",
            r"\bposition-anchor\s*:",
            r"\banchor\(",
        ],
        risk_level: RiskLevel::Experimental,
        alternatives: &["sticky-positioning"],
        complementary: &["popover"],
        ..CSS
    },
    // Selectors
    PatternSpec {
        id: "has",
        name: ":has()",
        aliases: &["css-has", "has-selector", "relational-pseudo-class"],
        regexes: &[r":has\("],
        risk_level: RiskLevel::Experimental,
        alternatives: &["is", "where", "not"],
        complementary: &["is", "where"],
        ..CSS
    },
    PatternSpec {
        id: "is",
        name: ":is()",
        aliases: &["css-is", "matches-any"],
        regexes: &[r":is\("],
        complementary: &["where"],
        ..CSS
    },
    PatternSpec {
        id: "where",
        name: ":where()",
        aliases: &["css-where"],
        regexes: &[r":where\("],
        complementary: &["is"],
        ..CSS
    },
    PatternSpec {
        id: "not",
        name: ":not()",
        aliases: &["css-not", "negation-pseudo-class"],
        regexes: &[r":not\("],
        ..CSS
    },
    PatternSpec {
        id: "focus-visible",
        name: ":focus-visible",
        aliases: &["css-focus-visible"],
        regexes: &[r":focus-visible\b"],
        ..CSS
    },
    PatternSpec {
        id: "nesting",
        name: "CSS nesting",
        aliases: &["css-nesting"],
        regexes: &[r"&\s*(?::[a-z]|\.[A-Za-z_-]|>|\+|~)"],
        risk_level: RiskLevel::Moderate,
        complementary: &["is"],
        ..CSS
    },
    // Custom values
    PatternSpec {
        id: "custom-properties",
        name: "Custom properties",
        aliases: &["css-variables", "css-custom-properties"],
        regexes: &[r"var\(\s*--", r"\B--[A-Za-z][\w-]*\s*:"],
        complementary: &["clamp"],
        ..CSS
    },
    PatternSpec {
        id: "clamp",
        name: "clamp()",
        aliases: &["min-max-clamp", "css-math-functions"],
        regexes: &[r"\bclamp\("],
        complementary: &["custom-properties"],
        ..CSS
    },
    PatternSpec {
        id: "color-mix",
        name: "color-mix()",
        aliases: &["css-color-mix"],
        regexes: &[r"\bcolor-mix\("],
        risk_level: RiskLevel::Moderate,
        alternatives: &["custom-properties"],
        complementary: &["oklab"],
        ..CSS
    },
    PatternSpec {
        id: "oklab",
        name: "Oklab and OkLCh",
        aliases: &["oklch", "css-oklab"],
        regexes: &[r"\bokl(?:ab|ch)\("],
        risk_level: RiskLevel::Moderate,
        complementary: &["color-mix"],
        ..CSS
    },
    // Visual effects
    PatternSpec {
        id: "backdrop-filter",
        name: "backdrop-filter",
        aliases: &["css-backdrop-filter"],
        regexes: &[r"\bbackdrop-filter\s*:"],
        risk_level: RiskLevel::Moderate,
        ..CSS
    },
    PatternSpec {
        id: "clip-path",
        name: "clip-path",
        aliases: &["css-clip-path"],
        regexes: &[r"clip-path\s*:"],
        ..CSS
    },
    // Animation
    PatternSpec {
        id: "transitions",
        name: "CSS transitions",
        aliases: &["css-transitions"],
        regexes: &[
            r"\btransition\s*:",
            r"\btransition-(?:property|duration|timing-function|delay)\s*:",
        ],
        ..CSS
    },
    PatternSpec {
        id: "animations-css",
        name: "CSS animations",
        aliases: &["css-animations", "keyframes"],
        regexes: &[r"@keyframes\b"],
        complementary: &["transitions"],
        ..CSS
    },
    PatternSpec {
        id: "view-transitions",
        name: "View transitions",
        aliases: &["css-view-transitions", "view-transition"],
        regexes: &[r"\bview-transition-name\s*:", r"::view-transition"],
        risk_level: RiskLevel::Experimental,
        alternatives: &["transitions", "animations-css"],
        ..CSS
    },
    PatternSpec {
        id: "scroll-driven-animations",
        name: "Scroll-driven animations",
        aliases: &["css-scroll-driven-animations", "scroll-timeline"],
        regexes: &[
            r"\banimation-timeline\s*:",
            r"\bscroll-timeline(?:-name)?\s*:",
            r"\bview-timeline(?:-name)?\s*:",
        ],
        risk_level: RiskLevel::Experimental,
        alternatives: &["intersection-observer", "animations-css"],
        complementary: &["animations-css"],
        ..CSS
    },
    // Scroll and interaction
    PatternSpec {
        id: "scroll-snap",
        name: "Scroll snap",
        aliases: &["css-scroll-snap"],
        regexes: &[r"\bscroll-snap-(?:type|align|stop)\s*:"],
        complementary: &["scroll-behavior", "overscroll-behavior"],
        ..CSS
    },
    PatternSpec {
        id: "scroll-behavior",
        name: "scroll-behavior",
        aliases: &["css-scroll-behavior", "smooth-scroll"],
        regexes: &[r"\bscroll-behavior\s*:"],
        ..CSS
    },
    PatternSpec {
        id: "overscroll-behavior",
        name: "overscroll-behavior",
        aliases: &["css-overscroll-behavior"],
        regexes: &[r"\boverscroll-behavior(?:-x|-y|-inline|-block)?\s*:"],
        ..CSS
    },
    PatternSpec {
        id: "scrollbar-gutter",
        name: "scrollbar-gutter",
        aliases: &["css-scrollbar-gutter"],
        regexes: &[r"\bscrollbar-gutter\s*:"],
        risk_level: RiskLevel::Moderate,
        ..CSS
    },
    // Cascade
    PatternSpec {
        id: "cascade-layers",
        name: "Cascade layers",
        aliases: &["css-cascade-layers", "layer"],
        regexes: &[r"@layer\b"],
        complementary: &["supports"],
        ..CSS
    },
    PatternSpec {
        id: "scope",
        name: "@scope",
        aliases: &["css-scope"],
        regexes: &[r"@scope\b"],
        risk_level: RiskLevel::Experimental,
        alternatives: &["cascade-layers"],
        complementary: &["nesting"],
        ..CSS
    },
    PatternSpec {
        id: "supports",
        name: "@supports",
        aliases: &["feature-queries", "css-supports"],
        regexes: &[r"@supports\b"],
        ..CSS
    },
    // Markup
    PatternSpec {
        id: "dialog",
        name: "<dialog>",
        aliases: &["dialog-element"],
        regexes: &[r"<dialog\b", r"\.showModal\s*\("],
        complementary: &["popover"],
        ..HTML
    },
    PatternSpec {
        id: "popover",
        name: "Popover",
        aliases: &["popover-api"],
        regexes: &[r"<[A-Za-z][^>]*\spopover(?:target)?\b", r"\.showPopover\s*\("],
        risk_level: RiskLevel::Moderate,
        alternatives: &["dialog"],
        complementary: &["anchor-positioning"],
        ..HTML
    },
    PatternSpec {
        id: "loading-lazy",
        name: "Lazy loading",
        aliases: &["lazy-loading"],
        regexes: &[r#"\bloading\s*=\s*["']?lazy\b"#],
        complementary: &["intersection-observer"],
        ..HTML
    },
    // JavaScript language features
    PatternSpec {
        id: "promise",
        name: "Promise",
        aliases: &["promises"],
        regexes: &[
            r"\bnew\s+Promise\b",
            r"\bPromise\.(?:all|allSettled|any|race|resolve|reject)\b",
        ],
        upgrade_to: Some("async-await"),
        complementary: &["abort-controller"],
        ..JS
    },
    PatternSpec {
        id: "async-await",
        name: "Async functions",
        aliases: &["async-functions"],
        regexes: &[r"\basync\s+function\b", r"\bawait\s+"],
        complementary: &["fetch", "promise"],
        supersedes: &["promise"],
        ..JS
    },
    PatternSpec {
        id: "optional-chaining",
        name: "Optional chaining",
        aliases: &["optional-chaining-operator"],
        regexes: &[r"[\w\])]\?\.[A-Za-z_$\[(]"],
        complementary: &["nullish-coalescing"],
        ..JS
    },
    PatternSpec {
        id: "nullish-coalescing",
        name: "Nullish coalescing",
        aliases: &["nullish-coalescing-operator"],
        regexes: &[r"\?\?=?"],
        complementary: &["optional-chaining"],
        ..JS
    },
    PatternSpec {
        id: "structured-clone",
        name: "structuredClone()",
        aliases: &["structuredclone"],
        regexes: &[r"\bstructuredClone\s*\("],
        ..JS
    },
    PatternSpec {
        id: "array-at",
        name: "Array at()",
        aliases: &["at"],
        regexes: &[r"\.at\s*\(\s*-?\d"],
        ..JS
    },
    PatternSpec {
        id: "array-grouping",
        name: "Array grouping",
        aliases: &["object-groupby", "map-groupby"],
        regexes: &[r"\b(?:Object|Map)\.groupBy\s*\("],
        risk_level: RiskLevel::Moderate,
        ..JS
    },
    // Browser APIs
    PatternSpec {
        id: "fetch",
        name: "Fetch",
        aliases: &["fetch-api"],
        regexes: &[r"\bfetch\s*\("],
        complementary: &["abort-controller", "async-await"],
        supersedes: &["xhr"],
        ..API
    },
    PatternSpec {
        id: "xhr",
        name: "XMLHttpRequest",
        aliases: &["xmlhttprequest"],
        regexes: &[r"\bnew\s+XMLHttpRequest\b"],
        alternatives: &["fetch"],
        upgrade_to: Some("fetch"),
        ..API
    },
    PatternSpec {
        id: "abort-controller",
        name: "AbortController",
        aliases: &["abortcontroller", "abort-signal"],
        regexes: &[r"\bnew\s+AbortController\b", r"\bAbortSignal\.timeout\s*\("],
        complementary: &["fetch"],
        ..API
    },
    PatternSpec {
        id: "intersection-observer",
        name: "IntersectionObserver",
        aliases: &["intersectionobserver"],
        regexes: &[r"\bnew\s+IntersectionObserver\b"],
        complementary: &["resize-observer", "mutation-observer"],
        ..API
    },
    PatternSpec {
        id: "resize-observer",
        name: "ResizeObserver",
        aliases: &["resizeobserver"],
        regexes: &[r"\bnew\s+ResizeObserver\b"],
        complementary: &["intersection-observer"],
        ..API
    },
    PatternSpec {
        id: "mutation-observer",
        name: "MutationObserver",
        aliases: &["mutationobserver"],
        regexes: &[r"\bnew\s+MutationObserver\b"],
        ..API
    },
    PatternSpec {
        id: "custom-elements",
        name: "Custom elements",
        aliases: &["web-components", "autonomous-custom-elements"],
        regexes: &[r"\bcustomElements\.define\s*\(", r"\battachShadow\s*\("],
        ..API
    },
    PatternSpec {
        id: "service-workers",
        name: "Service workers",
        aliases: &["serviceworkers", "service-worker"],
        regexes: &[r"\bnavigator\.serviceWorker\b"],
        ..API
    },
    PatternSpec {
        id: "web-animations",
        name: "Web Animations",
        aliases: &["element-animate", "web-animations-api"],
        regexes: &[r"\.animate\s*\(\s*[\[{]"],
        ..API
    },
    PatternSpec {
        id: "async-clipboard",
        name: "Async clipboard",
        aliases: &["clipboard-api"],
        regexes: &[r"\bnavigator\.clipboard\.(?:writeText|readText|write|read)\b"],
        risk_level: RiskLevel::Moderate,
        ..API
    },
    PatternSpec {
        id: "url-pattern",
        name: "URLPattern",
        aliases: &["urlpattern"],
        regexes: &[r"\bnew\s+URLPattern\b"],
        risk_level: RiskLevel::Experimental,
        ..API
    },
];
