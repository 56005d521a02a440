use rand::Rng;
use serde::{Deserialize, Serialize};

/// Themed word lists available without any network access
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Animals,
    Food,
    Places,
    Objects,
    Professions,
    Sports,
    Movies,
    /// Mature content, gated behind a two-step confirmation
    Adult,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Animals,
        Category::Food,
        Category::Places,
        Category::Objects,
        Category::Professions,
        Category::Sports,
        Category::Movies,
        Category::Adult,
    ];

    pub fn is_mature(&self) -> bool {
        matches!(self, Category::Adult)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Food => "Food",
            Category::Places => "Places",
            Category::Objects => "Objects",
            Category::Professions => "Professions",
            Category::Sports => "Sports",
            Category::Movies => "Movies & TV",
            Category::Adult => "Adults only (+18)",
        }
    }

    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Category::Animals => ANIMALS,
            Category::Food => FOOD,
            Category::Places => PLACES,
            Category::Objects => OBJECTS,
            Category::Professions => PROFESSIONS,
            Category::Sports => SPORTS,
            Category::Movies => MOVIES,
            Category::Adult => ADULT,
        }
    }
}

const ANIMALS: &[&str] = &[
    "Lion", "Penguin", "Giraffe", "Dolphin", "Elephant", "Kangaroo", "Octopus", "Owl", "Camel",
    "Shark", "Butterfly", "Crocodile", "Panda", "Squirrel", "Flamingo", "Bat", "Turtle", "Wolf",
];

const FOOD: &[&str] = &[
    "Pizza", "Sushi", "Paella", "Chocolate", "Popcorn", "Taco", "Pancake", "Omelette", "Lasagna",
    "Watermelon", "Croissant", "Ice cream", "Burger", "Garlic", "Honey", "Cheese", "Soup",
];

const PLACES: &[&str] = &[
    "Beach", "Hospital", "Airport", "Library", "Museum", "Desert", "Casino", "Prison", "Volcano",
    "Supermarket", "Stadium", "Castle", "Cinema", "Gym", "Farm", "Submarine", "Cemetery",
];

const OBJECTS: &[&str] = &[
    "Umbrella", "Mirror", "Candle", "Ladder", "Scissors", "Toothbrush", "Backpack", "Compass",
    "Pillow", "Guitar", "Key", "Clock", "Balloon", "Glasses", "Hammer", "Wallet", "Camera",
];

const PROFESSIONS: &[&str] = &[
    "Firefighter", "Dentist", "Pilot", "Chef", "Astronaut", "Lawyer", "Teacher", "Plumber",
    "Magician", "Detective", "Farmer", "Surgeon", "Lifeguard", "Barber", "Journalist",
];

const SPORTS: &[&str] = &[
    "Football", "Tennis", "Surfing", "Boxing", "Chess", "Golf", "Skiing", "Basketball", "Fencing",
    "Marathon", "Climbing", "Volleyball", "Archery", "Rugby", "Karate",
];

const MOVIES: &[&str] = &[
    "Titanic", "Shrek", "Batman", "Frozen", "Jaws", "Matrix", "Avatar", "Gladiator", "Rocky",
    "Toy Story", "Star Wars", "Harry Potter", "Jurassic Park", "The Simpsons", "Friends",
];

const ADULT: &[&str] = &[
    "Hangover", "Tequila", "Strip club", "Walk of shame", "Tinder", "Hickey", "Lingerie",
    "Bachelor party", "One-night stand", "Handcuffs", "Skinny dipping", "Booty call",
];

/// Pick a word uniformly from a list
pub fn pick_from<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> Option<&'static str> {
    if words.is_empty() {
        return None;
    }
    Some(words[rng.random_range(0..words.len())])
}

/// Every family-friendly word, used for the fully random mode
pub fn random_pool() -> impl Iterator<Item = &'static str> {
    Category::ALL
        .iter()
        .filter(|c| !c.is_mature())
        .flat_map(|c| c.words().iter().copied())
}

/// Pick a word uniformly across all family-friendly categories
pub fn pick_random<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static str> {
    let total = random_pool().count();
    if total == 0 {
        return None;
    }
    random_pool().nth(rng.random_range(0..total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_has_words() {
        for category in Category::ALL {
            assert!(
                category.words().len() >= 10,
                "{:?} has too few words",
                category
            );
        }
    }

    #[test]
    fn test_only_adult_is_mature() {
        let mature: Vec<_> = Category::ALL.iter().filter(|c| c.is_mature()).collect();
        assert_eq!(mature, vec![&Category::Adult]);
    }

    #[test]
    fn test_random_pool_excludes_mature_words() {
        let pool: HashSet<_> = random_pool().collect();
        for word in Category::Adult.words() {
            assert!(!pool.contains(word));
        }
        assert!(pool.contains("Lion"));
    }

    #[test]
    fn test_pick_from_category() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let word = pick_from(Category::Food.words(), &mut rng).unwrap();
            assert!(Category::Food.words().contains(&word));
        }
        assert!(pick_from(&[], &mut rng).is_none());
    }

    #[test]
    fn test_pick_random_covers_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let seen: HashSet<_> = (0..2000).filter_map(|_| pick_random(&mut rng)).collect();
        // Words from more than one category show up
        assert!(seen.iter().any(|w| Category::Animals.words().contains(w)));
        assert!(seen.iter().any(|w| Category::Sports.words().contains(w)));
    }

    #[test]
    fn test_category_serializes_screaming() {
        let json = serde_json::to_string(&Category::Adult).unwrap();
        assert_eq!(json, "\"ADULT\"");
    }
}
