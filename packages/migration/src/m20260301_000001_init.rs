use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    JoinCode,
    Status,
    Category,
    CreatedBy,
    CurrentDrawerId,
    CurrentCardId,
    Round,
    MaxRounds,
    Version,
    CreatedAt,
    UpdatedAt,
    StartedAt,
    FinishedAt,
}

#[derive(DeriveIden)]
enum GamePlayers {
    Table,
    Id,
    GameId,
    PlayerId,
    Username,
    Score,
    CorrectGuesses,
    IsHost,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Cards {
    Table,
    Id,
    GameId,
    Word,
    Description,
    Category,
    IsUsed,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Turns {
    Table,
    Id,
    GameId,
    Round,
    DrawerId,
    CardId,
    Status,
    TimeLimit,
    StartedAt,
    CompletedAt,
    CorrectGuesses,
    WinnerId,
    PointsAwarded,
    DrawerPointsAwarded,
    DrawingRef,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Guesses {
    Table,
    Id,
    GameId,
    TurnId,
    PlayerId,
    GuessText,
    IsCorrect,
    IsFuzzyMatch,
    SubmittedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Games::JoinCode)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(16)
                            .not_null()
                            .default("waiting"),
                    )
                    .col(ColumnDef::new(Games::Category).string().not_null())
                    .col(ColumnDef::new(Games::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Games::CurrentDrawerId).string().null())
                    .col(ColumnDef::new(Games::CurrentCardId).big_integer().null())
                    .col(
                        ColumnDef::new(Games::Round)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Games::MaxRounds).integer().not_null())
                    .col(
                        ColumnDef::new(Games::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::FinishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // game_players
        manager
            .create_table(
                Table::create()
                    .table(GamePlayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GamePlayers::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(GamePlayers::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GamePlayers::PlayerId).string().not_null())
                    .col(ColumnDef::new(GamePlayers::Username).string().not_null())
                    .col(
                        ColumnDef::new(GamePlayers::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::CorrectGuesses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::IsHost)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GamePlayers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_players_game_id")
                            .from(GamePlayers::Table, GamePlayers::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_players_game_player_unique")
                    .table(GamePlayers::Table)
                    .col(GamePlayers::GameId)
                    .col(GamePlayers::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // cards
        manager
            .create_table(
                Table::create()
                    .table(Cards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cards::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Cards::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Cards::Word).string().not_null())
                    .col(ColumnDef::new(Cards::Description).string().not_null())
                    .col(ColumnDef::new(Cards::Category).string().not_null())
                    .col(
                        ColumnDef::new(Cards::IsUsed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Cards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_game_id")
                            .from(Cards::Table, Cards::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_game_unused")
                    .table(Cards::Table)
                    .col(Cards::GameId)
                    .col(Cards::IsUsed)
                    .to_owned(),
            )
            .await?;

        // turns
        manager
            .create_table(
                Table::create()
                    .table(Turns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Turns::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Turns::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Turns::Round).integer().not_null())
                    .col(ColumnDef::new(Turns::DrawerId).string().not_null())
                    .col(ColumnDef::new(Turns::CardId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Turns::Status)
                            .string_len(16)
                            .not_null()
                            .default("drawing"),
                    )
                    .col(ColumnDef::new(Turns::TimeLimit).integer().not_null())
                    .col(
                        ColumnDef::new(Turns::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Turns::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Turns::CorrectGuesses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Turns::WinnerId).string().null())
                    .col(
                        ColumnDef::new(Turns::PointsAwarded)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Turns::DrawerPointsAwarded)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Turns::DrawingRef).string().null())
                    .col(
                        ColumnDef::new(Turns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_turns_game_id")
                            .from(Turns::Table, Turns::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_turns_card_id")
                            .from(Turns::Table, Turns::CardId)
                            .to(Cards::Table, Cards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A card backs at most one turn.
        manager
            .create_index(
                Index::create()
                    .name("idx_turns_card_unique")
                    .table(Turns::Table)
                    .col(Turns::CardId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_turns_game_round")
                    .table(Turns::Table)
                    .col(Turns::GameId)
                    .col(Turns::Round)
                    .to_owned(),
            )
            .await?;

        // guesses
        manager
            .create_table(
                Table::create()
                    .table(Guesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guesses::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Guesses::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Guesses::TurnId).big_integer().not_null())
                    .col(ColumnDef::new(Guesses::PlayerId).string().not_null())
                    .col(ColumnDef::new(Guesses::GuessText).string().not_null())
                    .col(
                        ColumnDef::new(Guesses::IsCorrect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Guesses::IsFuzzyMatch)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Guesses::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guesses_game_id")
                            .from(Guesses::Table, Guesses::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guesses_turn_id")
                            .from(Guesses::Table, Guesses::TurnId)
                            .to(Turns::Table, Turns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guesses_turn")
                    .table(Guesses::Table)
                    .col(Guesses::TurnId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guesses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Turns::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cards::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GamePlayers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
