use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Credit {
    Platform(&'static str),
    Author(&'static str),
}

impl Credit {
    pub fn label(&self) -> String {
        match self {
            Credit::Platform(p) => format!("Platform: {}", p),
            Credit::Author(a) => format!("Author: {}", a),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: u32,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub credit: Credit,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResourceCategory {
    pub name: &'static str,
    pub resources: &'static [Resource],
}

pub static CATALOG: &[ResourceCategory] = &[
    ResourceCategory {
        name: "Core AI & Machine Learning",
        resources: &[
            Resource {
                id: 1,
                title: "Machine Learning by Andrew Ng",
                kind: "Online Course",
                credit: Credit::Platform("Coursera"),
                url: "https://www.coursera.org/learn/machine-learning",
            },
            Resource {
                id: 2,
                title: "Deep Learning Specialization",
                kind: "Online Course",
                credit: Credit::Platform("Coursera"),
                url: "https://www.coursera.org/specializations/deep-learning",
            },
            Resource {
                id: 3,
                title: "Pattern Recognition and Machine Learning",
                kind: "Book",
                credit: Credit::Author("C. Bishop"),
                url: "https://www.google.com/search?q=Pattern+Recognition+and+Machine+Learning+by+Christopher+Bishop",
            },
        ],
    },
    ResourceCategory {
        name: "Robotics",
        resources: &[
            Resource {
                id: 6,
                title: "Robotics: Modelling, Planning and Control",
                kind: "Book",
                credit: Credit::Author("B. Siciliano"),
                url: "https://www.google.com/search?q=Robotics+Modelling+Planning+and+Control+by+Bruno+Siciliano",
            },
            Resource {
                id: 7,
                title: "ROS (Robot Operating System) Tutorials",
                kind: "Documentation",
                credit: Credit::Platform("ROS.org"),
                url: "http://wiki.ros.org/ROS/Tutorials",
            },
            Resource {
                id: 8,
                title: "Modern Robotics Specialization",
                kind: "Online Course",
                credit: Credit::Platform("Coursera"),
                url: "https://www.coursera.org/specializations/modernrobotics",
            },
        ],
    },
    ResourceCategory {
        name: "Advanced Topics",
        resources: &[
            Resource {
                id: 10,
                title: "Reinforcement Learning: An Introduction",
                kind: "Book",
                credit: Credit::Author("Sutton & Barto"),
                url: "http://incompleteideas.net/book/the-book-2nd.html",
            },
            Resource {
                id: 11,
                title: "Computer Vision: Algorithms and Applications",
                kind: "Book",
                credit: Credit::Author("R. Szeliski"),
                url: "http://szeliski.org/Book/",
            },
            Resource {
                id: 12,
                title: "Natural Language Processing with Transformers",
                kind: "Book",
                credit: Credit::Author("L. Tunstall"),
                url: "https://www.google.com/search?q=Natural+Language+Processing+with+Transformers+by+Lewis+Tunstall",
            },
        ],
    },
];

pub fn catalog() -> &'static [ResourceCategory] {
    CATALOG
}

pub fn find(id: u32) -> Option<&'static Resource> {
    CATALOG
        .iter()
        .flat_map(|c| c.resources.iter())
        .find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: Vec<u32> = CATALOG.iter().flat_map(|c| c.resources.iter().map(|r| r.id)).collect();
        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_find_and_credit_label() {
        let ros = find(7).unwrap();
        assert_eq!(ros.credit.label(), "Platform: ROS.org");
        assert_eq!(find(10).unwrap().credit.label(), "Author: Sutton & Barto");
        assert!(find(99).is_none());
    }
}
