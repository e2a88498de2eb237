use eps_types::{AppEvent, Field};

pub const HELP: &str = "\
Commands:
  more                      load the next catalog page
  refresh                   reload the catalog from the first page
  list                      show loaded entries (or search results)
  search <text>             filter loaded entries
  clear                     clear the search
  type <bangla|korean> <t>  autocomplete input
  pick <n>                  take suggestion n
  lookup <bangla|korean> <t> search the catalog, translate if nothing matches
  fav <n>                   toggle favorite for listed entry n
  unfav <n>                 remove favorite n as numbered by `favs`
  favs                      show favorites by day
  offline | online          simulate connectivity
  help | quit";

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command `{0}`, type `help`")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not a position, counting starts at 1")]
    BadIndex(String),
}

/// One line of user input. Positions are typed 1-based and carried 0-based.
pub fn parse_command(line: &str) -> Result<Option<AppEvent>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let event = match name.to_lowercase().as_str() {
        "more" => AppEvent::LoadMore,
        "refresh" => AppEvent::Refresh,
        "list" => AppEvent::ListCatalog,
        "search" if rest.is_empty() => AppEvent::ClearSearch,
        "search" => AppEvent::LocalSearch(rest.to_string()),
        "clear" => AppEvent::ClearSearch,
        "type" => {
            let (field, text) = field_and_text(rest, "type <bangla|korean> <text>")?;
            AppEvent::SuggestInput { field, text }
        }
        "pick" => AppEvent::PickSuggestion(index(rest, "pick <n>")?),
        "lookup" => {
            let (field, text) = field_and_text(rest, "lookup <bangla|korean> <text>")?;
            if text.is_empty() {
                return Err(CommandError::Usage("lookup <bangla|korean> <text>"));
            }
            AppEvent::Lookup { field, text }
        }
        "fav" => AppEvent::ToggleFavorite(index(rest, "fav <n>")?),
        "unfav" => AppEvent::RemoveFavorite(index(rest, "unfav <n>")?),
        "favs" => AppEvent::ShowFavorites,
        "offline" => AppEvent::ConnectivityChanged(false),
        "online" => AppEvent::ConnectivityChanged(true),
        "help" | "?" => AppEvent::Help,
        "quit" | "exit" => AppEvent::Quit,
        _ => return Err(CommandError::Unknown(name.to_string())),
    };

    Ok(Some(event))
}

/// `<field> <text>`, where text may be empty to clear the input
fn field_and_text(rest: &str, usage: &'static str) -> Result<(Field, String), CommandError> {
    let (field, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let field = field.parse().map_err(|_| CommandError::Usage(usage))?;
    Ok((field, text.trim().to_string()))
}

fn index(rest: &str, usage: &'static str) -> Result<usize, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::BadIndex(rest.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> AppEvent {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn blank_line_is_ignored() {
        assert!(matches!(parse_command("   "), Ok(None)));
    }

    #[test]
    fn search_keeps_inner_spaces() {
        assert!(matches!(
            parse("search  পানির বোতল "),
            AppEvent::LocalSearch(text) if text == "পানির বোতল"
        ));
        assert!(matches!(parse("search"), AppEvent::ClearSearch));
    }

    #[test]
    fn type_accepts_field_aliases_and_empty_text() {
        assert!(matches!(
            parse("type ko 사"),
            AppEvent::SuggestInput { field: Field::Korean, text } if text == "사"
        ));
        assert!(matches!(
            parse("type bangla"),
            AppEvent::SuggestInput { field: Field::Bangla, text } if text.is_empty()
        ));
        assert_eq!(
            parse_command("type english hi").unwrap_err(),
            CommandError::Usage("type <bangla|korean> <text>")
        );
    }

    #[test]
    fn lookup_requires_text() {
        assert!(matches!(
            parse("lookup korean 사랑"),
            AppEvent::Lookup { field: Field::Korean, text } if text == "사랑"
        ));
        assert!(parse_command("lookup korean").is_err());
    }

    #[test]
    fn positions_are_one_based() {
        assert!(matches!(parse("pick 1"), AppEvent::PickSuggestion(0)));
        assert!(matches!(parse("fav 3"), AppEvent::ToggleFavorite(2)));
        assert!(matches!(parse("unfav 2"), AppEvent::RemoveFavorite(1)));
        assert_eq!(
            parse_command("fav 0").unwrap_err(),
            CommandError::BadIndex("0".to_string())
        );
        assert_eq!(
            parse_command("pick").unwrap_err(),
            CommandError::Usage("pick <n>")
        );
    }

    #[test]
    fn connectivity_and_lifecycle() {
        assert!(matches!(parse("offline"), AppEvent::ConnectivityChanged(false)));
        assert!(matches!(parse("ONLINE"), AppEvent::ConnectivityChanged(true)));
        assert!(matches!(parse("exit"), AppEvent::Quit));
        assert_eq!(
            parse_command("dance").unwrap_err(),
            CommandError::Unknown("dance".to_string())
        );
    }
}
