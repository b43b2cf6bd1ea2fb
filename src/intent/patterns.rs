//! Built-in rule tables for the three workflow intents.

use once_cell::sync::Lazy;

use super::rules::{Rule, RuleSet};

/// Phrasings that ask for a *new* issue.
///
/// Shared by the creation set (as inclusions) and the work set (as
/// exclusions), so "create an issue to fix this" can never read as work.
fn creation_phrasing() -> Vec<Rule> {
    vec![
        Rule::include(
            "create-verb-issue",
            r"\b(create|make|generate|file|add|write)\b.*\b(github\s+)?issue\b",
        ),
        // "open" needs an article: "the open issue" names an existing one
        Rule::include(
            "open-an-issue",
            r"\bopen\s+(up\s+)?(an?|another)\b.*\b(github\s+)?issue\b",
        ),
        Rule::include("track-as-issue", r"\btrack\s+(this|that|it)\s+as\s+(an?\s+)?issue\b"),
        Rule::include("turn-into-issue", r"\bturn\s+(this|that|it)\s+into\s+(an?\s+)?issue\b"),
        Rule::include(
            "document-as-issue",
            r"\bdocument\s+(this|that|it)\s+as\s+(an?\s+)?issue\b",
        ),
        Rule::include("new-issue", r"\bnew\s+(github\s+)?issue\b"),
    ]
}

/// Requests to open a tracking issue.
pub static CREATION: Lazy<RuleSet> = Lazy::new(|| {
    let mut rules = vec![
        // "fix the open issue" talks about an existing issue
        Rule::exclude(
            "existing-open-issue",
            r"\b(the|that|this|existing)\s+open\s+issues?\b",
        ),
    ];
    rules.extend(creation_phrasing());
    rules.extend([
        Rule::include(
            "put-in-issues",
            r"\bput\s+(this|that|it)\s+(in|on)\s+(github\s+)?issues?\b",
        ),
        Rule::include("add-to-issues", r"\badd\s+(this|that|it)\s+to\s+(github\s+)?issues?\b"),
        Rule::include(
            "lets-create-issue",
            r"\blet['’]?s?\s+(create|make|open|file|write)\s+(an?\s+)?(github\s+)?issue\b",
        ),
        Rule::include(
            "we-should-create-issue",
            r"\bwe\s+should\s+(create|make|open|file)\s+(an?\s+)?(github\s+)?issue\b",
        ),
        Rule::include(
            "can-you-create-issue",
            r"\bcan\s+you\s+(create|make|open|file)\s+(an?\s+)?(github\s+)?issue\b",
        ),
        Rule::include(
            "please-create-issue",
            r"\bplease\s+(create|make|open|file)\s+(an?\s+)?(github\s+)?issue\b",
        ),
        Rule::include(
            "issue-about",
            r"\b(new|an?)\s+(github\s+)?issue\s+(for|about|regarding|to)\b",
        ),
        Rule::include("issue-to-track", r"\bissue\s+to\s+(track|document)\b"),
        Rule::include(
            "issue-should-be-created",
            r"\bgithub\s+issue\s+(should|needs?\s+to)\s+be\s+(created|made|opened)\b",
        ),
    ]);
    RuleSet::new("creation", rules)
});

/// Requests to work on an existing issue.
pub static WORK: Lazy<RuleSet> = Lazy::new(|| {
    let mut rules: Vec<Rule> = creation_phrasing().iter().map(Rule::as_exclusion).collect();
    rules.extend([
        Rule::include(
            "verb-then-issue",
            r"\b(fix|work\s+on|address|tackle|resolve|handle|debug|implement|solve)\b.*(\bissue\b|#\d+\b)",
        ),
        Rule::include(
            "issue-then-verb",
            r"\bissue\s*#?\s*\d+\b.*\b(fix|work|address|tackle|resolve|handle|debug|implement|solve)\b",
        ),
        Rule::include(
            "finish-issue",
            r"\b(close\s+out|finish|complete|wrap\s+up)\b.*(\bissue\b|#\d+\b)",
        ),
        Rule::include(
            "issue-then-finish",
            r"\bissue\s*#?\s*\d+\b.*\b(close|finish|complete|wrap)\b",
        ),
        Rule::include(
            "fix-the-problem",
            r"\b(fix|address|tackle|resolve|debug|solve)\s+(that|the|this)\s+(bug|problem|issue|error|enhancement|feature)\b",
        ),
        Rule::include(
            "work-on-the-feature",
            r"\b(work\s+on|handle|implement)\s+(that|the|this)\s+(bug|problem|issue|enhancement|feature)\b",
        ),
        Rule::include(
            "lets-fix",
            r"\blet['’]?s?\s+(fix|work\s+on|address|tackle|resolve|handle|debug|implement)\b.*(\b(issue|bug|problem)\b|#\d+)",
        ),
        Rule::include(
            "can-you-fix",
            r"\bcan\s+you\s+(fix|work\s+on|address|tackle|resolve|handle|debug|implement)\b.*(\b(issue|bug|problem)\b|#\d+)",
        ),
        Rule::include(
            "please-fix",
            r"\bplease\s+(fix|work\s+on|address|tackle|resolve|handle|debug|implement)\b.*(\b(issue|bug|problem)\b|#\d+)",
        ),
        Rule::include(
            "issue-needs-fixing",
            r"\bissue\s*#?\d+\b.*\b(needs?\s+to\s+be|should\s+be)\s+(fixed|addressed|resolved|handled|implemented)\b",
        ),
        Rule::include(
            "start-work",
            r"\b(start|begin)\s+(work(ing)?|fix(ing)?)\s+(on\s+)?(issue\s*)?#?\d+\b",
        ),
        Rule::include(
            "look-at-issue",
            r"\b(look\s+at|check\s+out|investigate|examine|review\s+and\s+fix)\s+(issue\s*)?#?\d+\b",
        ),
        Rule::include(
            "fix-what-we-discussed",
            r"\b(fix|address|resolve|tackle)\b.*\b(we\s+discussed|mentioned|talked\s+about)\b",
        ),
        Rule::include(
            "discussed-then-fix",
            r"\b(we\s+discussed|mentioned|talked\s+about)\b.*\b(fix|address|resolve|tackle)\b",
        ),
        Rule::include("invoke-worker", r"\b(use|invoke|run|trigger)\s+(the\s+)?issue[- ]?worker\b"),
    ]);
    RuleSet::new("work", rules)
});

/// Approval of finished work awaiting sign-off.
pub static APPROVAL: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::new(
        "approval",
        vec![
            Rule::exclude(
                "negated-approval",
                r"\b(not\s+)?(don['’]?t|do\s+not)\s+(approve|lgtm|ship|merge|close)\b",
            ),
            Rule::exclude("not-yet-approved", r"\b(not|isn['’]?t)\s+(yet\s+)?approved\b"),
            Rule::exclude(
                "refusal",
                r"\b(no|nope|nah),?\s*(don['’]?t|do\s+not)?\s*(approve|merge|close)\b",
            ),
            Rule::exclude(
                "needs-changes",
                r"\b(needs?\s+(more\s+)?changes?|needs?\s+work|not\s+ready)\b",
            ),
            Rule::exclude("fix-first", r"\b(fix|change|update|modify)\s+(this|that|it)\s+first\b"),
            Rule::exclude("hold", r"\b(wait|hold|stop|pause)\b.*\b(merge|close|approve)\b"),
            Rule::exclude("actually-no", r"\bactually,?\s*(no|wait|hold)\b"),
            Rule::include("lgtm", r"\blgtm\b"),
            Rule::include("ship-it", r"\bship\s+it\b"),
            Rule::include("approved", r"\bapproved?\b"),
            Rule::include("proceed", r"\bproceed\b"),
            Rule::include("go-ahead", r"\bgo\s+ahead\b"),
            Rule::include("looks-good", r"\blooks?\s+(good|great|fine|correct)\b"),
            Rule::include("merge-it", r"\bmerge\s+it\b"),
            Rule::include("close-it", r"\bclose\s+(it|the\s+issue)\b"),
            Rule::include("close-out-issue", r"\bclose\s+out\s+(the\s+)?issue\b"),
            Rule::include(
                "yes-go-ahead",
                r"\b(yes|yep|yeah|yup),?\s*(go\s+ahead|proceed|merge|close|approve)\b",
            ),
            Rule::include("go-ahead-and", r"\bgo\s+ahead\s+and\s+(merge|close|approve)\b"),
            Rule::include("i-approve", r"\bi\s+approve\b"),
            Rule::include("changes-approved", r"\bchanges?\s+(are\s+)?approved?\b"),
            Rule::include("approve-changes", r"\bapprove\s+(the\s+)?changes?\b"),
            Rule::include(
                "ready-to-merge",
                r"\b(it['’]?s?|that['’]?s?)\s+ready\s+(to\s+)?(merge|close|go)\b",
            ),
            Rule::include("ready-to-ship", r"\bready\s+to\s+(merge|close|ship)\b"),
            Rule::include(
                "invoke-closer",
                r"\b(use|invoke|run|trigger|call)\s+(the\s+)?issue[- ]?closer\b",
            ),
            Rule::include("wrap-up", r"\b(wrap|finish)\s+(it\s+)?up\b"),
            Rule::include("lets-merge", r"\blet['’]?s?\s+(merge|close|finish|wrap)\b"),
        ],
    )
});
