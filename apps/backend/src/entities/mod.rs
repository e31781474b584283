pub mod cards;
pub mod game_players;
pub mod games;
pub mod guesses;
pub mod turns;

pub use cards::Entity as Cards;
pub use cards::Model as Card;
pub use game_players::Entity as GamePlayers;
pub use game_players::Model as GamePlayer;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use guesses::Entity as Guesses;
pub use guesses::Model as Guess;
pub use turns::Entity as Turns;
pub use turns::Model as Turn;
