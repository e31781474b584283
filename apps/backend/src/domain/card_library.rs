//! Built-in prompt library, used when the card generator is unavailable.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::domain::guess_text::normalize;

/// A word to draw and a one-line hint for the drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub word: String,
    pub description: String,
}

type Entry = (&'static str, &'static str);

const ANIMALS: &[Entry] = &[
    ("Gatto", "Felino domestico che fa le fusa"),
    ("Cane", "Il migliore amico dell'uomo"),
    ("Elefante", "Grande mammifero con la proboscide"),
    ("Giraffa", "Animale dal collo lunghissimo"),
    ("Pinguino", "Uccello che non vola e vive al freddo"),
    ("Tartaruga", "Rettile lento con il guscio"),
    ("Farfalla", "Insetto dalle ali colorate"),
    ("Serpente", "Rettile senza zampe"),
    ("Coniglio", "Ha le orecchie lunghe e mangia carote"),
    ("Delfino", "Mammifero marino intelligente"),
    ("Leone", "Il re della savana"),
    ("Gufo", "Uccello notturno dai grandi occhi"),
];

const FOOD: &[Entry] = &[
    ("Pizza", "Disco di pasta con pomodoro e mozzarella"),
    ("Spaghetti", "Pasta lunga e sottile"),
    ("Gelato", "Dolce freddo in cono o coppetta"),
    ("Banana", "Frutto giallo e curvo"),
    ("Anguria", "Frutto estivo verde fuori e rosso dentro"),
    ("Formaggio", "Derivato del latte, a volte con i buchi"),
    ("Panino", "Pane farcito"),
    ("Torta", "Dolce delle feste con le candeline"),
    ("Uovo", "Si cucina fritto, sodo o strapazzato"),
    ("Carota", "Ortaggio arancione"),
    ("Croissant", "Dolce da colazione a mezzaluna"),
];

const OBJECTS: &[Entry] = &[
    ("Ombrello", "Ripara dalla pioggia"),
    ("Chiave", "Apre porte e lucchetti"),
    ("Occhiali", "Aiutano a vedere meglio"),
    ("Forbici", "Servono a tagliare la carta"),
    ("Lampadina", "Si accende quando hai un'idea"),
    ("Orologio", "Segna le ore"),
    ("Telefono", "Serve a chiamare"),
    ("Candela", "Fa luce con una fiamma"),
    ("Zaino", "Borsa da portare sulle spalle"),
    ("Martello", "Attrezzo per piantare chiodi"),
    ("Chitarra", "Strumento a sei corde"),
];

const PLACES: &[Entry] = &[
    ("Spiaggia", "Sabbia, mare e ombrelloni"),
    ("Montagna", "Cima alta, a volte innevata"),
    ("Ospedale", "Dove lavorano medici e infermieri"),
    ("Scuola", "Banchi, lavagna e compiti"),
    ("Castello", "Dimora fortificata con torri"),
    ("Aeroporto", "Da qui partono gli aerei"),
    ("Biblioteca", "Luogo pieno di libri"),
    ("Deserto", "Distesa di sabbia e cactus"),
    ("Faro", "Torre che guida le navi"),
    ("Stazione", "Dove arrivano e partono i treni"),
];

const SPORTS: &[Entry] = &[
    ("Calcio", "Due squadre, un pallone e due porte"),
    ("Tennis", "Racchette, rete e pallina gialla"),
    ("Nuoto", "Sport in piscina"),
    ("Sci", "Si scende sulla neve"),
    ("Ciclismo", "Si pedala su due ruote"),
    ("Pallavolo", "La palla non deve toccare terra"),
    ("Boxe", "Si combatte con i guantoni"),
    ("Golf", "Mazze, buche e prato verde"),
    ("Surf", "Si cavalcano le onde"),
    ("Basket", "Il pallone va nel canestro"),
];

const GENERIC: &[Entry] = &[
    ("Sole", "Stella che ci scalda"),
    ("Luna", "Brilla di notte"),
    ("Casa", "Tetto, porta e finestre"),
    ("Albero", "Tronco, rami e foglie"),
    ("Nuvola", "Bianca e soffice nel cielo"),
    ("Fiore", "Petali colorati"),
    ("Stella", "Punto luminoso nel cielo notturno"),
    ("Arcobaleno", "Sette colori dopo la pioggia"),
    ("Barca", "Galleggia sull'acqua"),
    ("Treno", "Corre sui binari"),
    ("Robot", "Macchina che imita l'uomo"),
    ("Razzo", "Vola nello spazio"),
    ("Pupazzo di neve", "Tre palle di neve e una carota"),
    ("Drago", "Creatura leggendaria che sputa fuoco"),
    ("Corona", "La indossa il re"),
    ("Aquilone", "Vola nel vento legato a un filo"),
    ("Bicicletta", "Due ruote, pedali e campanello"),
    ("Cappello", "Si porta in testa"),
    ("Scarpa", "Va al piede, con i lacci"),
    ("Libro", "Pagine da sfogliare"),
    ("Matita", "Scrive e si cancella con la gomma"),
    ("Ponte", "Attraversa un fiume"),
    ("Vulcano", "Montagna che erutta lava"),
    ("Isola", "Terra circondata dal mare"),
    ("Fantasma", "Lenzuolo bianco che fa paura"),
    ("Sirena", "Mezza donna e mezza pesce"),
    ("Pirata", "Benda sull'occhio e nave con il teschio"),
    ("Tenda", "Casa da campeggio"),
    ("Aereo", "Ali, motori e passeggeri"),
    ("Semaforo", "Rosso, giallo e verde"),
    ("Fulmine", "Lampo durante il temporale"),
];

const CATEGORIES: &[&[Entry]] = &[ANIMALS, FOOD, OBJECTS, PLACES, SPORTS];

fn pool_for(category: &str) -> &'static [Entry] {
    match normalize(category).as_str() {
        "animali" | "animals" | "animale" | "animal" => ANIMALS,
        "cibo" | "food" | "cucina" => FOOD,
        "oggetti" | "objects" | "oggetto" | "object" => OBJECTS,
        "luoghi" | "places" | "luogo" | "place" => PLACES,
        "sport" | "sports" => SPORTS,
        _ => &[],
    }
}

/// Distinct words the library can hand to a single game, whatever its
/// category.
pub fn capacity() -> usize {
    CATEGORIES
        .iter()
        .copied()
        .chain([GENERIC])
        .flat_map(|pool| pool.iter())
        .map(|(word, _)| normalize(word))
        .collect::<HashSet<_>>()
        .len()
}

/// Up to `count` prompts for `category`, skipping anything in `avoid`
/// (compared after normalization). Category prompts come first, then the
/// generic pool, then the other categories; each tier is shuffled.
pub fn fallback_prompts(category: &str, count: usize, avoid: &[String]) -> Vec<Prompt> {
    let mut seen: HashSet<String> = avoid.iter().map(|w| normalize(w)).collect();
    let mut rng = rand::rng();

    let primary = pool_for(category);
    let mut tiers: Vec<Vec<Entry>> = vec![primary.to_vec(), GENERIC.to_vec()];
    tiers.push(
        CATEGORIES
            .iter()
            .filter(|pool| !std::ptr::eq(**pool, primary))
            .flat_map(|pool| pool.iter().copied())
            .collect(),
    );
    for tier in &mut tiers {
        tier.shuffle(&mut rng);
    }

    let mut out = Vec::with_capacity(count);
    for (word, description) in tiers.into_iter().flatten() {
        if out.len() >= count {
            break;
        }
        if seen.insert(normalize(word)) {
            out.push(Prompt {
                word: word.to_string(),
                description: description.to_string(),
            });
        }
    }
    out
}
