use engine::{CombatEvent, EffectNote, OutOfRangeReason, Verdict, WeaponInfo, WeaponSlot};

fn sword() -> WeaponInfo {
    WeaponInfo {
        name: Some("sword".to_string()),
        slot: WeaponSlot::Primary,
    }
}

#[test]
fn log_lines_render_in_the_bracketed_style() {
    insta::assert_snapshot!(
        CombatEvent::RoundStarted { round: 1 }.to_string(),
        @"[ROUND] 1"
    );

    insta::assert_snapshot!(
        CombatEvent::Damage {
            actor: "Steve".to_string(),
            target: "Alex".to_string(),
            weapon: sword(),
            amount: 12.5,
            armor_absorbed: 0.0,
            boots_resisted: 0.0,
            target_health: 87.5,
            ammo_remaining: None,
        }
        .to_string(),
        @"[HIT][Steve] sword hits Alex for 12.5 -> 87.5 HP"
    );

    insta::assert_snapshot!(
        CombatEvent::Blocked {
            actor: "Steve".to_string(),
            target: "Alex".to_string(),
            weapon: sword(),
            shield_durability: 40,
        }
        .to_string(),
        @"[BLOCK][Alex] blocks Steve's sword (shield at 40)"
    );

    insta::assert_snapshot!(
        CombatEvent::Dodged {
            actor: "Steve".to_string(),
            target: "Alex".to_string(),
            weapon: sword(),
        }
        .to_string(),
        @"[DODGE][Alex] evades Steve's sword"
    );

    insta::assert_snapshot!(
        CombatEvent::Moved {
            actor: "Steve".to_string(),
            target: "Alex".to_string(),
            before: 5.0,
            after: 4.0,
        }
        .to_string(),
        @"[MOVE][Steve] closes on Alex (5.0 -> 4.0)"
    );

    insta::assert_snapshot!(
        CombatEvent::OutOfRange {
            actor: "Steve".to_string(),
            target: "Alex".to_string(),
            reason: OutOfRangeReason::Distance,
            distance: 5.0,
            weapon: None,
            moved: true,
        }
        .to_string(),
        @"[RANGE][Steve] cannot reach Alex (distance 5.0)"
    );

    insta::assert_snapshot!(
        CombatEvent::OutOfRange {
            actor: "Bren".to_string(),
            target: "Vulk".to_string(),
            reason: OutOfRangeReason::NoAmmo,
            distance: 6.0,
            weapon: Some(WeaponInfo {
                name: Some("longbow".to_string()),
                slot: WeaponSlot::Primary,
            }),
            moved: false,
        }
        .to_string(),
        @"[RANGE][Bren] longbow is empty, holding position (distance 6.0)"
    );

    insta::assert_snapshot!(
        CombatEvent::PoisonTick {
            actor: "Kez".to_string(),
            damage: 4.0,
            turns_left: 2,
        }
        .to_string(),
        @"[POISON][Kez] takes 4.0 damage (2 turns left)"
    );

    insta::assert_snapshot!(
        CombatEvent::ConsumableUsed {
            actor: "Steve".to_string(),
            item: "red elixir".to_string(),
            notes: vec![EffectNote::Healed { amount: 24.0 }],
        }
        .to_string(),
        @"[ITEM][Steve] uses red elixir (healed 24.0 HP)"
    );

    insta::assert_snapshot!(
        CombatEvent::Eliminated {
            fighter: "Alex".to_string(),
            remaining: 1,
        }
        .to_string(),
        @"[DOWN][Alex] is eliminated (1 left)"
    );

    insta::assert_snapshot!(
        CombatEvent::Resolved {
            verdict: Verdict::Victory {
                team: "wardens".to_string(),
                survivors: vec!["Bren".to_string(), "Olta".to_string()],
            },
        }
        .to_string(),
        @"[END] wardens wins (survivors: Bren, Olta)"
    );

    insta::assert_snapshot!(
        CombatEvent::Resolved {
            verdict: Verdict::Stalemate { rounds: 1000 },
        }
        .to_string(),
        @"[END] stalemate after 1000 rounds"
    );
}

#[test]
fn effect_notes_render_compactly() {
    insta::assert_snapshot!(
        EffectNote::AttackBonus { percent: 0.25, turns: 3 }.to_string(),
        @"+25% attack for 3 turns"
    );
    insta::assert_snapshot!(
        EffectNote::AmmoRestored { amount: 5 }.to_string(),
        @"restored 5 ammo"
    );
    insta::assert_snapshot!(EffectNote::PoisonCleansed.to_string(), @"poison cleansed");
}

#[test]
fn fists_are_the_unarmed_label() {
    let event = CombatEvent::Dodged {
        actor: "A".to_string(),
        target: "B".to_string(),
        weapon: WeaponInfo::unarmed(),
    };
    assert_eq!(event.to_string(), "[DODGE][B] evades A's fists");
}

#[test]
fn events_serialize_with_a_kind_tag() {
    let event = CombatEvent::Eliminated {
        fighter: "Alex".to_string(),
        remaining: 2,
    };
    let json = serde_json::to_value(&event).expect("serializes");
    assert_eq!(json["kind"], "eliminated");
    assert_eq!(json["fighter"], "Alex");
    assert_eq!(json["remaining"], 2);
}
