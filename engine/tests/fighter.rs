use engine::{Boots, Fighter, Food, Potion, Quiver, Roller, Weapon};

#[test]
fn distance_is_symmetric() {
    let a = Fighter::new("A", 100.0).at(2.0);
    let b = Fighter::new("B", 100.0).at(-3.0);
    assert_eq!(a.distance_to(&b), 5.0);
    assert_eq!(b.distance_to(&a), 5.0);
}

#[test]
fn move_towards_steps_one_unit_by_default() {
    let mut a = Fighter::new("A", 100.0);
    let b = Fighter::new("B", 100.0).at(5.0);
    a.move_towards(&b);
    assert_eq!(a.position(), 1.0);

    let mut c = Fighter::new("C", 100.0).at(5.0);
    let d = Fighter::new("D", 100.0);
    c.move_towards(&d);
    assert_eq!(c.position(), 4.0);
}

#[test]
fn move_towards_never_overshoots() {
    let mut a = Fighter::new("A", 100.0);
    let b = Fighter::new("B", 100.0).at(0.4);
    a.move_towards(&b);
    assert_eq!(a.position(), 0.4);

    // already there: no-op
    let mut c = Fighter::new("C", 100.0).at(0.4);
    c.move_towards(&b);
    assert_eq!(c.position(), 0.4);
}

#[test]
fn movement_buff_and_boots_scale_the_step() {
    let mut a = Fighter::new("A", 100.0).with_boots(Boots::running());
    let b = Fighter::new("B", 100.0).at(10.0);
    a.add_movement_bonus(0.5, 1);

    // 1.0 base + 0.5 buff + 0.5 boots = 2.0
    a.move_towards(&b);
    assert_eq!(a.position(), 2.0);
    assert_eq!(a.movement_buff().turns, 0);
    assert_eq!(a.movement_buff().percent, 0.0);

    // buff spent, boots remain: 1.5
    a.move_towards(&b);
    assert_eq!(a.position(), 3.5);
}

#[test]
fn heavy_boots_slow_the_wearer() {
    let mut a = Fighter::new("A", 100.0).with_boots(Boots::heavy());
    let b = Fighter::new("B", 100.0).at(10.0);
    a.move_towards(&b);
    assert!((a.position() - 0.8).abs() < 1e-9);
}

#[test]
fn healing_is_uncapped_and_never_negative() {
    let mut a = Fighter::new("A", 50.0);
    assert_eq!(a.heal(100.0), 100.0);
    assert_eq!(a.health(), 150.0);
    assert_eq!(a.max_health(), 50.0);

    assert_eq!(a.heal(-10.0), 0.0);
    assert_eq!(a.health(), 150.0);
}

#[test]
fn cleanse_on_unpoisoned_fighter_is_a_noop() {
    let mut a = Fighter::new("A", 100.0);
    assert!(!a.cleanse_poison());

    a.apply_poison(3.0, 2);
    assert!(a.is_poisoned());
    assert!(a.cleanse_poison());
    assert!(!a.is_poisoned());
}

#[test]
fn poison_does_not_stack_it_overwrites() {
    let mut a = Fighter::new("A", 100.0);
    a.apply_poison(2.0, 5);
    a.apply_poison(7.0, 1);
    let poison = a.poison().expect("poisoned");
    assert_eq!(poison.damage_per_turn, 7.0);
    assert_eq!(poison.turns_left, 1);
}

#[test]
fn poison_ticks_at_turn_start_until_it_expires() {
    let mut a = Fighter::new("A", 10.0);
    a.apply_poison(4.0, 2);

    let tick = a.begin_turn().expect("first tick");
    assert_eq!(tick.damage, 4.0);
    assert_eq!(tick.turns_left, 1);
    assert!(!tick.expired);
    assert_eq!(a.health(), 6.0);

    let tick = a.begin_turn().expect("second tick");
    assert!(tick.expired);
    assert_eq!(a.health(), 2.0);
    assert!(!a.is_poisoned());

    assert!(a.begin_turn().is_none());
}

#[test]
fn a_poison_tick_can_kill() {
    let mut a = Fighter::new("A", 3.0);
    a.apply_poison(5.0, 2);
    a.begin_turn();
    assert!(!a.is_alive());
    assert_eq!(a.health(), -2.0);
}

#[test]
fn buff_magnitude_accumulates_duration_takes_the_max() {
    let mut a = Fighter::new("A", 100.0);
    a.add_attack_bonus(0.2, 3);
    a.add_attack_bonus(0.3, 1);
    let buff = a.attack_buff();
    assert!((buff.percent - 0.5).abs() < 1e-9);
    assert_eq!(buff.turns, 3);
}

#[test]
fn total_ammo_ignores_infinite_quivers() {
    let a = Fighter::new("A", 100.0)
        .with_primary(Weapon::ranged("bow", 6.0, 8.0, Quiver::new(12)))
        .with_secondary(Weapon::ranged("wand", 4.0, 6.0, Quiver::infinite()));
    assert_eq!(a.total_ammo(), 12);

    let melee_only = Fighter::new("B", 100.0).with_primary(Weapon::melee("axe", 7.0, 1.0));
    assert_eq!(melee_only.total_ammo(), 0);
}

#[test]
fn restore_ammo_sums_over_both_slots() {
    let mut drained = Quiver::new(10);
    for _ in 0..10 {
        drained.consume();
    }
    let mut also_drained = Quiver::new(4);
    for _ in 0..4 {
        also_drained.consume();
    }
    let mut a = Fighter::new("A", 100.0)
        .with_primary(Weapon::ranged("bow", 6.0, 8.0, drained))
        .with_secondary(Weapon::ranged("sling", 3.0, 4.0, also_drained));

    // half of each capacity: 5 + 2
    assert_eq!(a.restore_ammo(0.5, 0), 7);
    assert_eq!(a.total_ammo(), 7);
}

#[test]
fn invalid_inventory_index_is_a_noop() {
    let mut roller = Roller::from_seed(1);
    let mut a = Fighter::new("A", 100.0).carrying(Food::plain("bread", 10.0));
    assert!(a.use_consumable(5, &mut roller).is_none());
    assert_eq!(a.inventory().len(), 1);
}

#[test]
fn using_a_consumable_removes_it_in_order() {
    let mut roller = Roller::from_seed(1);
    let mut a = Fighter::new("A", 100.0)
        .carrying(Food::plain("bread", 10.0))
        .carrying(Potion::antidote("tonic"))
        .carrying(Food::plain("cheese", 5.0));

    let used = a.use_consumable(1, &mut roller).expect("used");
    assert_eq!(used.item, "tonic");
    let names: Vec<_> = a.inventory().iter().map(|c| c.name().to_string()).collect();
    assert_eq!(names, vec!["bread", "cheese"]);

    // food heals immediately
    assert_eq!(a.health(), 100.0);
    let used = a.use_consumable(0, &mut roller).expect("used");
    assert_eq!(used.item, "bread");
    assert_eq!(a.health(), 110.0);
}
