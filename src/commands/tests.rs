use super::*;
use crate::gateway::testing::MemoryStore;
use image::{ImageFormat, RgbImage};

fn ctx<'a>(store: &'a MemoryStore, text: &'a str, lang: &'a str) -> CommandContext<'a> {
    CommandContext { store, text, lang }
}

#[test]
fn test_parse_flow_commands() {
    assert_eq!(Input::parse("/start"), Input::Flow(Event::Start));
    assert_eq!(Input::parse("/start@nudge_bot"), Input::Flow(Event::Start));
    assert_eq!(Input::parse("/weather"), Input::Flow(Event::Weather));
    assert_eq!(Input::parse("/weather extra"), Input::Flow(Event::Weather));
}

#[test]
fn test_parse_stateless_commands() {
    assert_eq!(Input::parse("/help"), Input::Command(Command::Help));
    assert_eq!(Input::parse("/echo hi"), Input::Command(Command::Echo));
    assert_eq!(Input::parse("/menu@bot"), Input::Command(Command::Menu));
    assert_eq!(Input::parse("/users"), Input::Command(Command::Users));
}

#[test]
fn test_parse_plain_text_and_unknown_commands() {
    assert_eq!(
        Input::parse("Anna"),
        Input::Flow(Event::Text("Anna".into()))
    );
    assert_eq!(
        Input::parse("/unknown thing"),
        Input::Flow(Event::Text("/unknown thing".into()))
    );
    assert_eq!(Input::parse("   "), Input::Flow(Event::Text("   ".into())));
    // Commands must lead the message.
    assert_eq!(
        Input::parse("say /help"),
        Input::Flow(Event::Text("say /help".into()))
    );
}

#[test]
fn test_command_args() {
    assert_eq!(command_args("/echo hello world"), "hello world");
    assert_eq!(command_args("/echo   spaced  "), "spaced");
    assert_eq!(command_args("/echo"), "");
    assert_eq!(command_args("/echo\nnext line"), "next line");
}

#[tokio::test]
async fn test_help_lists_commands() {
    let store = MemoryStore::default();
    let reply = handle(Command::Help, &ctx(&store, "/help", "Russian")).await;
    for cmd in ["/start", "/help", "/echo", "/menu", "/users", "/weather"] {
        assert!(reply.text.contains(cmd), "help should mention {cmd}");
    }
    assert!(reply.markup.is_none());
}

#[tokio::test]
async fn test_echo() {
    let store = MemoryStore::default();
    let reply = handle(Command::Echo, &ctx(&store, "/echo привет", "Russian")).await;
    assert_eq!(reply.text, "привет");

    let reply = handle(Command::Echo, &ctx(&store, "/echo", "Russian")).await;
    assert_eq!(reply.text, "Вы не ввели сообщение для эхо.");
}

#[tokio::test]
async fn test_menu_has_two_choices() {
    let store = MemoryStore::default();
    let reply = handle(Command::Menu, &ctx(&store, "/menu", "Russian")).await;
    assert_eq!(reply.text, "Сделайте выбор:");
    let kb = reply.markup.unwrap();
    assert_eq!(kb.rows.len(), 1);
    let data: Vec<_> = kb.rows[0].iter().map(|b| b.callback_data.as_str()).collect();
    assert_eq!(data, vec!["choice_1", "choice_2"]);
    assert_eq!(kb.rows[0][0].text, "Выбор 1");
}

#[tokio::test]
async fn test_users_listing_and_empty() {
    let store = MemoryStore::default();
    let reply = handle(Command::Users, &ctx(&store, "/users", "English")).await;
    assert_eq!(reply.text, "No registered users.");

    let store = MemoryStore::with_users(&[5]);
    let reply = handle(Command::Users, &ctx(&store, "/users", "English")).await;
    assert!(reply.text.contains("ID: 5, Name: user5, Age: 30"));
}

#[tokio::test]
async fn test_users_storage_error() {
    let store = MemoryStore::broken();
    let reply = handle(Command::Users, &ctx(&store, "/users", "Russian")).await;
    assert_eq!(
        reply.text,
        "Произошла ошибка при получении списка пользователей."
    );
}

#[test]
fn test_parse_choice() {
    assert_eq!(parse_choice("choice_1"), Some(MenuChoice::Option(1)));
    assert_eq!(parse_choice("choice_2"), Some(MenuChoice::Option(2)));
    assert_eq!(parse_choice("choice_3"), Some(MenuChoice::Unknown));
    assert_eq!(parse_choice("choice_"), Some(MenuChoice::Unknown));
    assert_eq!(parse_choice("other"), None);
    assert_eq!(parse_choice(""), None);
}

#[test]
fn test_image_dimensions_png() {
    let img = RgbImage::new(7, 3);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    assert_eq!(image_dimensions(buf.get_ref()).unwrap(), (7, 3));
}

#[test]
fn test_image_dimensions_garbage() {
    assert!(image_dimensions(b"definitely not an image").is_err());
}
