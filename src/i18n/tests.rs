use super::*;
use nudge_core::user::{UserId, UserRecord};
use nudge_core::weather::WeatherSummary;

#[test]
fn test_all_keys_exist_in_both_languages() {
    let keys = [
        "ask_name",
        "ask_age",
        "age_not_numeric",
        "forgot_to_reply",
        "ask_city",
        "city_not_found",
        "weather_unavailable",
        "lookup_failed",
        "lookup_malformed",
        "unknown",
        "help",
        "echo_empty",
        "menu_prompt",
        "no_users",
        "users_header",
        "users_error",
        "image_fetch_failed",
        "image_probe_failed",
        "generic_error",
        "daily_notification",
    ];
    for key in keys {
        for lang in ["Russian", "English"] {
            assert_ne!(t(key, lang), "???", "{key} missing for {lang}");
        }
        assert_ne!(t(key, "Russian"), t(key, "English"), "{key} is untranslated");
    }
}

#[test]
fn test_unknown_key_and_language_fallback() {
    assert_eq!(t("no_such_key", "Russian"), "???");
    assert_eq!(t("ask_name", "Klingon"), t("ask_name", "Russian"));
}

#[test]
fn test_plural_form_boundaries() {
    assert_eq!(plural_form(21), PluralForm::One);
    assert_eq!(plural_form(22), PluralForm::Few);
    assert_eq!(plural_form(11), PluralForm::Many);
    assert_eq!(plural_form(5), PluralForm::Many);
    assert_eq!(plural_form(1), PluralForm::One);
    assert_eq!(plural_form(0), PluralForm::Many);
    assert_eq!(plural_form(4), PluralForm::Few);
    assert_eq!(plural_form(10), PluralForm::Many);
    assert_eq!(plural_form(20), PluralForm::Many);
    assert_eq!(plural_form(101), PluralForm::One);
    assert_eq!(plural_form(111), PluralForm::Many);
    assert_eq!(plural_form(112), PluralForm::Many);
    assert_eq!(plural_form(122), PluralForm::Few);
}

#[test]
fn test_plural_form_negative_uses_nonnegative_residue() {
    // -5 mod 100 = 95, last digit 5.
    assert_eq!(plural_form(-5), PluralForm::Many);
    // -9 mod 100 = 91, last digit 1.
    assert_eq!(plural_form(-9), PluralForm::One);
    // -88 mod 100 = 12, inside the 10..=20 band.
    assert_eq!(plural_form(-88), PluralForm::Many);
}

#[test]
fn test_age_unit_words() {
    assert_eq!(age_unit("Russian", 21), "год");
    assert_eq!(age_unit("Russian", 22), "года");
    assert_eq!(age_unit("Russian", 11), "лет");
    assert_eq!(age_unit("Russian", 5), "лет");
    assert_eq!(age_unit("English", 1), "year");
    assert_eq!(age_unit("English", 21), "year");
    assert_eq!(age_unit("English", 22), "years");
}

#[test]
fn test_greeting() {
    assert_eq!(
        greeting("Russian", "Anna", 30),
        "Приятно познакомиться, Anna!\nТебе 30 лет."
    );
    assert_eq!(
        greeting("English", "Anna", 32),
        "Nice to meet you, Anna!\nYou are 32 years old."
    );
}

#[test]
fn test_weather_description_table() {
    assert_eq!(weather_description("Russian", Some(0)), "Ясно");
    assert_eq!(weather_description("Russian", Some(8)), "Снег с дождем");
    assert_eq!(weather_description("Russian", Some(61)), "Неизвестно");
    assert_eq!(weather_description("Russian", None), "Неизвестно");
    assert_eq!(weather_description("English", Some(5)), "Thunderstorm");
}

#[test]
fn test_weather_report_lines() {
    let summary = WeatherSummary {
        temperature: 12.5,
        windspeed: 3.2,
        humidity: Some(81.0),
        weather_code: Some(2),
    };
    let report = weather_report("Russian", "Москва", &summary);
    assert_eq!(
        report,
        "Погода в городе Москва:\nТемпература: 12.5°C\nСкорость ветра: 3.2 м/с\nВлажность: 81%\nСостояние погоды: Облачно"
    );
}

#[test]
fn test_weather_report_unknown_humidity() {
    let summary = WeatherSummary {
        temperature: -1.5,
        windspeed: 0.5,
        humidity: None,
        weather_code: None,
    };
    let report = weather_report("English", "Oslo", &summary);
    assert!(report.contains("Humidity: unknown%"));
    assert!(report.contains("Conditions: Unknown"));
}

#[test]
fn test_users_list() {
    assert_eq!(users_list("Russian", &[]), "Нет зарегистрированных пользователей.");
    let users = vec![
        UserRecord {
            id: UserId(1),
            name: "Anna".into(),
            age: 30,
        },
        UserRecord {
            id: UserId(2),
            name: "Boris".into(),
            age: 41,
        },
    ];
    assert_eq!(
        users_list("Russian", &users),
        "Зарегистрированные пользователи:\n\nID: 1, Имя: Anna, Возраст: 30\nID: 2, Имя: Boris, Возраст: 41\n"
    );
}

#[test]
fn test_image_size_and_choices() {
    assert_eq!(image_size("Russian", 800, 600), "Размер изображения: 800x600 пикселей.");
    assert_eq!(choice_made("Russian", 1), "Вы выбрали Выбор 1");
    assert_eq!(choice_made("English", 2), "You chose Option 2");
}
