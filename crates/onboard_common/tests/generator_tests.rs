//! Task generation against the built-in catalog.

use chrono::NaiveDate;
use onboard_common::generator::shift_date;
use onboard_common::{TaskGenerator, TaskOwner, TemplateCatalog, DEFAULT_TEMPLATE_KEY};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn generator() -> TaskGenerator {
    TaskGenerator::new(Arc::new(TemplateCatalog::builtin()))
}

#[test]
fn eng_newgrad_scenario() {
    let out = generator().generate("eng", "newgrad", date(2024, 1, 15), "en");

    assert_eq!(out.template_key, "eng_newgrad");
    assert_eq!(out.tasks.len(), 3);
    assert_eq!(out.tasks[0].due_date, date(2024, 1, 15));
    assert_eq!(out.tasks[1].due_date, date(2024, 1, 22));
    assert_eq!(out.tasks[2].due_date, date(2024, 1, 16));

    // Declaration order, not due-date order
    assert_eq!(out.tasks[0].title, "Set up dev environment");
    assert_eq!(out.tasks[1].title, "Complete security training");
    assert_eq!(out.tasks[2].owner, TaskOwner::Manager);
}

#[test]
fn due_dates_follow_offsets_for_every_template() {
    let catalog = Arc::new(TemplateCatalog::builtin());
    let gen = TaskGenerator::new(catalog.clone());
    let start = date(2025, 6, 30);

    for key in catalog.keys() {
        let (role, grade) = key.split_once('_').unwrap();
        let (entry, _) = catalog.lookup(role, grade);
        let out = gen.generate(role, grade, start, "en");

        assert_eq!(out.template_key, key);
        assert_eq!(out.tasks.len(), entry.en.tasks.len());
        for (task, spec) in out.tasks.iter().zip(&entry.en.tasks) {
            assert_eq!(task.due_date, shift_date(start, spec.offset_days));
            assert_eq!(task.title, spec.title);
            assert_eq!(task.owner, spec.owner);
        }
    }
}

#[test]
fn unknown_role_grade_matches_general_newgrad() {
    let gen = generator();
    let start = date(2024, 9, 1);
    let explicit = gen.generate("general", "newgrad", start, "en");

    for (role, grade) in [("sales", "senior"), ("eng", "staff"), ("", ""), ("general", "")] {
        let out = gen.generate(role, grade, start, "en");
        assert_eq!(out.template_key, DEFAULT_TEMPLATE_KEY);
        assert_eq!(out.tasks, explicit.tasks);
        assert_eq!(out.plan, explicit.plan);
    }
}

#[test]
fn missing_language_uses_english_text() {
    let gen = generator();
    let start = date(2024, 4, 1);
    let en = gen.generate("cs", "mid", start, "en");

    for lang in ["fr", "EN", "", "zh-Hant"] {
        let out = gen.generate("cs", "mid", start, lang);
        assert_eq!(out.tasks, en.tasks, "lang {:?}", lang);
        assert_eq!(out.plan, en.plan);
        assert_eq!(out.language, "en");
    }
}

#[test]
fn japanese_variant_is_used_when_present() {
    let out = generator().generate("eng", "newgrad", date(2024, 1, 15), "ja");
    assert_eq!(out.language, "ja");
    assert_eq!(out.tasks[0].title, "開発環境をセットアップ");
    // Offsets are shared across languages
    assert_eq!(out.tasks[1].due_date, date(2024, 1, 22));
    assert!(out.plan.employee.day30.contains("PR"));
}

#[test]
fn fallback_and_language_combine() {
    let out = generator().generate("design", "mid", date(2024, 1, 15), "ja");
    assert_eq!(out.template_key, "general_newgrad");
    assert_eq!(out.tasks[0].title, "人事書類を完了");
}

#[test]
fn generation_is_idempotent() {
    let gen = generator();
    let a = gen.generate("general", "mid", date(2024, 12, 30), "ja");
    let b = gen.generate("general", "mid", date(2024, 12, 30), "ja");
    assert_eq!(a, b);

    // Year boundary
    assert_eq!(a.tasks[1].due_date, date(2025, 1, 2));
}

#[test]
fn generation_from_yaml_catalog() {
    let yaml = r#"
default_key: base_any
templates:
  base_any:
    en:
      tasks:
        - { owner: hr, title: Issue laptop, desc: Ship the laptop., offset: -5 }
      plan:
        employee: { day30: e30, day60: e60, day90: e90 }
        manager: { day30: m30, day60: m60, day90: m90 }
"#;
    let gen = TaskGenerator::new(Arc::new(TemplateCatalog::from_yaml_str(yaml).unwrap()));
    let out = gen.generate("eng", "newgrad", date(2024, 1, 15), "ja");

    assert_eq!(out.template_key, "base_any");
    assert_eq!(out.language, "en");
    assert_eq!(out.tasks[0].owner, TaskOwner::Hr);
    assert_eq!(out.tasks[0].due_date, date(2024, 1, 10));
    assert_eq!(out.plan.manager.day60, "m60");
}
