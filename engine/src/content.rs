use std::collections::HashMap;

pub fn builtin_scenarios() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("duel", include_str!("../content/scenarios/duel.json")),
        ("skirmish", include_str!("../content/scenarios/skirmish.json")),
    ])
}
