/// Bundled sample profiles
///
/// Stands in for a profile backend: discovery, matches, chats, liked-you
/// and the admin user list all read from this catalog.
use serde::{Deserialize, Serialize};

/// Label shown when an id has no catalog entry
pub const UNKNOWN_USER: &str = "Unknown User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Man,
    Woman,
    Nonbinary,
}

/// Who a member wants to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Men,
    Women,
    #[default]
    Everyone,
}

impl Interest {
    pub fn accepts(&self, gender: Gender) -> bool {
        match self {
            Interest::Men => gender == Gender::Man,
            Interest::Women => gender == Gender::Woman,
            Interest::Everyone => true,
        }
    }
}

/// A sample member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub age: u32,
    pub gender: Gender,
    pub email: &'static str,
    pub location: &'static str,
    pub distance_km: u32,
    pub occupation: &'static str,
    pub bio: &'static str,
    pub interests: &'static [&'static str],
    pub photos: &'static [&'static str],
    pub verified: bool,
    pub joined: &'static str,
}

const PROFILES: &[MockProfile] = &[
    MockProfile {
        id: "1",
        name: "Sarah",
        age: 26,
        gender: Gender::Woman,
        email: "sarah@example.com",
        location: "Brooklyn, NY",
        distance_km: 3,
        occupation: "Graphic Designer",
        bio: "Coffee snob, weekend hiker, always planning the next trip.",
        interests: &["Travel", "Hiking", "Coffee", "Art"],
        photos: &["/images/profiles/sarah-1.jpg", "/images/profiles/sarah-2.jpg"],
        verified: true,
        joined: "2024-01-12",
    },
    MockProfile {
        id: "2",
        name: "Michael",
        age: 29,
        gender: Gender::Man,
        email: "michael@example.com",
        location: "Manhattan, NY",
        distance_km: 5,
        occupation: "Software Engineer",
        bio: "Building things by day, cooking badly by night.",
        interests: &["Cooking", "Tech", "Running"],
        photos: &["/images/profiles/michael-1.jpg"],
        verified: true,
        joined: "2024-02-03",
    },
    MockProfile {
        id: "3",
        name: "Emma",
        age: 24,
        gender: Gender::Woman,
        email: "emma@example.com",
        location: "Queens, NY",
        distance_km: 8,
        occupation: "Nurse",
        bio: "Night shifts and sunrise runs. Dog person.",
        interests: &["Dogs", "Running", "Music"],
        photos: &["/images/profiles/emma-1.jpg", "/images/profiles/emma-2.jpg"],
        verified: false,
        joined: "2024-02-20",
    },
    MockProfile {
        id: "4",
        name: "James",
        age: 32,
        gender: Gender::Man,
        email: "james@example.com",
        location: "Jersey City, NJ",
        distance_km: 12,
        occupation: "Architect",
        bio: "I notice buildings so you don't have to.",
        interests: &["Architecture", "Photography", "Cycling"],
        photos: &["/images/profiles/james-1.jpg"],
        verified: true,
        joined: "2023-11-30",
    },
    MockProfile {
        id: "5",
        name: "Olivia",
        age: 27,
        gender: Gender::Woman,
        email: "olivia@example.com",
        location: "Hoboken, NJ",
        distance_km: 15,
        occupation: "Marketing Manager",
        bio: "Brunch enthusiast looking for a museum buddy.",
        interests: &["Museums", "Brunch", "Yoga"],
        photos: &["/images/profiles/olivia-1.jpg"],
        verified: false,
        joined: "2024-03-08",
    },
    MockProfile {
        id: "6",
        name: "Alex",
        age: 30,
        gender: Gender::Nonbinary,
        email: "alex@example.com",
        location: "Bronx, NY",
        distance_km: 18,
        occupation: "Musician",
        bio: "Plays bass in two bands, listens to everything.",
        interests: &["Music", "Vinyl", "Concerts"],
        photos: &["/images/profiles/alex-1.jpg", "/images/profiles/alex-2.jpg"],
        verified: true,
        joined: "2024-01-27",
    },
    MockProfile {
        id: "7",
        name: "Daniel",
        age: 35,
        gender: Gender::Man,
        email: "daniel@example.com",
        location: "Staten Island, NY",
        distance_km: 25,
        occupation: "Chef",
        bio: "Will cook for good conversation.",
        interests: &["Cooking", "Wine", "Travel"],
        photos: &["/images/profiles/daniel-1.jpg"],
        verified: false,
        joined: "2023-12-15",
    },
    MockProfile {
        id: "8",
        name: "Sophia",
        age: 22,
        gender: Gender::Woman,
        email: "sophia@example.com",
        location: "Astoria, NY",
        distance_km: 9,
        occupation: "Grad Student",
        bio: "Writing a thesis, reading everything else.",
        interests: &["Books", "Film", "Coffee"],
        photos: &["/images/profiles/sophia-1.jpg"],
        verified: true,
        joined: "2024-04-01",
    },
    MockProfile {
        id: "9",
        name: "Ryan",
        age: 28,
        gender: Gender::Man,
        email: "ryan@example.com",
        location: "Long Island City, NY",
        distance_km: 7,
        occupation: "Physical Therapist",
        bio: "Climbing gym regular. Ask me about knees.",
        interests: &["Climbing", "Fitness", "Hiking"],
        photos: &["/images/profiles/ryan-1.jpg", "/images/profiles/ryan-2.jpg"],
        verified: true,
        joined: "2024-03-19",
    },
    MockProfile {
        id: "10",
        name: "Mia",
        age: 31,
        gender: Gender::Woman,
        email: "mia@example.com",
        location: "Newark, NJ",
        distance_km: 30,
        occupation: "Lawyer",
        bio: "Debates for a living, agrees about pizza.",
        interests: &["Travel", "Pizza", "Tennis"],
        photos: &["/images/profiles/mia-1.jpg"],
        verified: false,
        joined: "2024-02-11",
    },
];

/// Every sample profile
pub fn profiles() -> &'static [MockProfile] {
    PROFILES
}

pub fn find(id: &str) -> Option<&'static MockProfile> {
    PROFILES.iter().find(|p| p.id == id)
}

/// Display name for an id, falling back to a placeholder
pub fn display_name(id: &str) -> String {
    find(id)
        .map(|p| p.name.to_string())
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}

/// Opening line used for a fresh match with no messages yet
pub fn greeting(profile: &MockProfile) -> String {
    format!("Hey! I'm {}. Great to match with you!", profile.name)
}
