use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use msx_launcher_data::DatabaseItem;
use msx_launcher_db::CatalogPersister;

use crate::cli_types::FavoriteAction;
use crate::error::CliError;

pub(crate) fn run(persister: &CatalogPersister, action: FavoriteAction) -> Result<(), CliError> {
    match action {
        FavoriteAction::Add { database, name } => {
            persister.add_favorite(&item(&name, &database))?;
            log::info!(
                "Added {} of {database} to favorites",
                name.if_supports_color(Stdout, |t| t.bold()),
            );
        }
        FavoriteAction::Remove { database, name } => {
            persister.delete_favorite(&item(&name, &database))?;
            log::info!(
                "Removed {} of {database} from favorites",
                name.if_supports_color(Stdout, |t| t.bold()),
            );
        }
        FavoriteAction::List => {
            let favorites = persister.get_favorites();
            for favorite in &favorites {
                log::info!(
                    "  {} {}",
                    favorite.game_name.if_supports_color(Stdout, |t| t.bold()),
                    format!("({})", favorite.database_name)
                        .if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            log::info!("{} favorite(s)", favorites.len());
        }
    }
    Ok(())
}

fn item(game_name: &str, database_name: &str) -> DatabaseItem {
    DatabaseItem {
        game_name: game_name.to_string(),
        database_name: database_name.to_string(),
    }
}
