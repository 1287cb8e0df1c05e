use engine::{
    Combat, CombatError, CombatEvent, Fighter, Party, Roller, Shield, Verdict, Weapon,
};
use predicates::prelude::*;

fn render(events: &[CombatEvent]) -> String {
    events
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn a_single_fighter_is_rejected() {
    let result = Combat::new(
        vec![Party::solo(Fighter::new("A", 100.0))],
        Roller::from_seed(1),
    );
    assert!(matches!(
        result,
        Err(CombatError::InvalidConfiguration { .. })
    ));
}

#[test]
fn a_single_team_is_rejected() {
    let result = Combat::new(
        vec![Party::group(vec![
            Fighter::new("A", 100.0),
            Fighter::new("B", 100.0),
        ])],
        Roller::from_seed(1),
    );
    assert!(matches!(
        result,
        Err(CombatError::InvalidConfiguration { .. })
    ));
}

#[test]
fn an_empty_party_is_rejected() {
    let result = Combat::new(
        vec![
            Party::solo(Fighter::new("A", 100.0)),
            Party::group(Vec::new()),
        ],
        Roller::from_seed(1),
    );
    assert!(matches!(
        result,
        Err(CombatError::InvalidConfiguration { .. })
    ));
}

fn duel_parties() -> Vec<Party> {
    vec![
        Party::solo(
            Fighter::new("Steve", 150.0).with_primary(Weapon::melee("wooden sword", 10.0, 1.0)),
        ),
        Party::solo(
            Fighter::new("Alex", 135.0)
                .at(4.0)
                .with_primary(Weapon::melee("stone axe", 7.0, 1.0)),
        ),
    ]
}

#[test]
fn identical_seeds_replay_identical_battles() {
    let mut first = Combat::new(duel_parties(), Roller::from_seed(42)).expect("combat");
    let mut second = Combat::new(duel_parties(), Roller::from_seed(42)).expect("combat");

    let verdict_a = first.start();
    let verdict_b = second.start();

    assert_eq!(verdict_a, verdict_b);
    assert_eq!(first.events(), second.events());

    // a different seed is allowed to diverge, and the log always resolves
    let mut third = Combat::new(duel_parties(), Roller::from_seed(43)).expect("combat");
    third.start();
    assert!(predicate::str::contains("[END]").eval(&render(third.events())));
}

#[test]
fn poison_alone_decides_a_battle_deterministically() {
    // The fighters are 100 apart and can never reach each other before the
    // poison finishes its work.
    let mut victim = Fighter::new("Kez", 25.0).at(100.0);
    victim.apply_poison(10.0, 3);
    let parties = vec![
        Party::solo(Fighter::new("Steve", 100.0)),
        Party::solo(victim),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(0)).expect("combat");
    let verdict = combat.start();

    assert_eq!(
        verdict,
        Verdict::Victory {
            team: "Steve".to_string(),
            survivors: vec!["Steve".to_string()],
        }
    );
    assert_eq!(combat.rounds(), 3);

    let log = render(combat.events());
    assert!(predicate::str::contains("[POISON][Kez]").eval(&log));
    assert!(predicate::str::contains("[DOWN][Kez] is eliminated").eval(&log));
}

#[test]
fn a_fighter_killed_by_its_own_poison_does_not_act() {
    let mut victim = Fighter::new("Kez", 5.0).at(100.0);
    victim.apply_poison(10.0, 2);
    let parties = vec![
        Party::solo(Fighter::new("Steve", 100.0)),
        Party::solo(victim),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(0)).expect("combat");
    combat.start();

    // Kez dies on the first tick: the only trace of Kez is the tick and the
    // elimination, never an action.
    for event in combat.events() {
        match event {
            CombatEvent::OutOfRange { actor, .. } | CombatEvent::Moved { actor, .. } => {
                assert_ne!(actor, "Kez");
            }
            _ => {}
        }
    }
    let tick_at = combat
        .events()
        .iter()
        .position(|e| matches!(e, CombatEvent::PoisonTick { actor, .. } if actor == "Kez"))
        .expect("poison tick");
    assert!(matches!(
        &combat.events()[tick_at + 1],
        CombatEvent::Eliminated { fighter, .. } if fighter == "Kez"
    ));
}

#[test]
fn unbreakable_shields_stall_into_the_round_cap() {
    let parties = vec![
        Party::solo(
            Fighter::new("A", 100.0)
                .with_primary(Weapon::melee("sword", 1.0, 1.0))
                .with_shield(Shield::new(1_000_000, 5)),
        ),
        Party::solo(
            Fighter::new("B", 100.0)
                .with_primary(Weapon::melee("sword", 1.0, 1.0))
                .with_shield(Shield::new(1_000_000, 5)),
        ),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(7))
        .expect("combat")
        .with_round_cap(10);
    let verdict = combat.start();

    assert_eq!(verdict, Verdict::Stalemate { rounds: 10 });
    assert_eq!(combat.rounds(), 10);
    assert!(predicate::str::contains("stalemate after 10 rounds")
        .eval(&render(combat.events())));
}

#[test]
fn a_named_party_wins_as_a_team() {
    // Unbreakable shields on the wardens, and their target cannot fight
    // back hard enough to matter.
    let parties = vec![
        Party::named(
            "wardens",
            vec![
                Fighter::new("Bren", 100.0)
                    .with_primary(Weapon::melee("sword", 10.0, 1.0))
                    .with_shield(Shield::new(1_000_000, 5)),
                Fighter::new("Olta", 100.0)
                    .at(1.0)
                    .with_primary(Weapon::melee("hammer", 10.0, 1.0))
                    .with_shield(Shield::new(1_000_000, 5)),
            ],
        ),
        Party::solo(Fighter::new("Vulk", 40.0).at(0.5)),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(12)).expect("combat");
    let verdict = combat.start();

    match verdict {
        Verdict::Victory { team, survivors } => {
            assert_eq!(team, "wardens");
            assert_eq!(survivors, vec!["Bren".to_string(), "Olta".to_string()]);
        }
        other => panic!("expected the wardens to win, got {other:?}"),
    }
    assert!(predicate::str::contains("[END] wardens wins").eval(&render(combat.events())));
}

#[test]
fn teammates_never_target_each_other() {
    // Two wardens adjacent to each other, enemy far away: every attack or
    // move must aim at the enemy.
    let parties = vec![
        Party::named(
            "wardens",
            vec![
                Fighter::new("Bren", 100.0).with_primary(Weapon::melee("sword", 10.0, 1.0)),
                Fighter::new("Olta", 100.0).with_primary(Weapon::melee("hammer", 10.0, 1.0)),
            ],
        ),
        Party::solo(Fighter::new("Vulk", 60.0).at(30.0)),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(5))
        .expect("combat")
        .with_round_cap(5);
    combat.start();

    for event in combat.events() {
        if let CombatEvent::OutOfRange { actor, target, .. } = event {
            if actor == "Bren" || actor == "Olta" {
                assert_eq!(target, "Vulk");
            }
        }
    }
}

#[test]
fn the_closest_enemy_is_attacked_first() {
    // B and C are equidistant from A; the first one scanned keeps the tie.
    let parties = vec![
        Party::solo(Fighter::new("A", 100.0).with_primary(Weapon::melee("pike", 10.0, 5.0))),
        Party::named(
            "raiders",
            vec![
                Fighter::new("B", 50.0).at(2.0),
                Fighter::new("C", 50.0).at(-2.0),
            ],
        ),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(9))
        .expect("combat")
        .with_round_cap(3);
    combat.start();

    let first_attack = combat
        .events()
        .iter()
        .find_map(|event| match event {
            CombatEvent::Damage { actor, target, .. }
            | CombatEvent::Dodged { actor, target, .. }
            | CombatEvent::Blocked { actor, target, .. }
                if actor == "A" =>
            {
                Some(target.clone())
            }
            _ => None,
        })
        .expect("A attacked someone");
    assert_eq!(first_attack, "B");
}

#[test]
fn dead_fighters_stay_in_the_roster_for_reporting() {
    let mut victim = Fighter::new("Kez", 5.0).at(100.0);
    victim.apply_poison(10.0, 1);
    let parties = vec![
        Party::solo(Fighter::new("Steve", 100.0)),
        Party::solo(victim),
    ];

    let mut combat = Combat::new(parties, Roller::from_seed(0)).expect("combat");
    combat.start();

    assert_eq!(combat.fighters().len(), 2);
    let kez = combat
        .fighters()
        .iter()
        .find(|f| f.name() == "Kez")
        .expect("still present");
    assert!(!kez.is_alive());
}
