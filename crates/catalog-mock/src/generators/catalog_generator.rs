//! 目录数据生成
//!
//! `seed_catalog` 写入固定的小型目录，内容与 `cascade_shared::test_utils::TestCatalog` 一致；
//! `CatalogGenerator` 按配置生成随机目录，给定种子时结果可复现。

use std::ops::Range;

use fake::Fake;
use fake::faker::address::en::CityName;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ClassRoom, Equipment, Grade, School};
use crate::store::{CatalogSnapshot, CatalogStore};

const EQUIPMENT_NAMES: &[&str] = &[
    "Calculator",
    "Microscope",
    "Globe",
    "Laptop",
    "Projector",
    "Whiteboard",
    "Telescope",
    "Beaker Set",
    "Tablet",
    "Speaker",
];

/// 写入固定目录
///
/// 两所学校：Lincoln HS（id=1，年级 9/10）与 Roosevelt MS（id=2，年级 7/8）。
pub fn seed_catalog(store: &CatalogStore) {
    let school = |id: i64, name: &str| School {
        id,
        name: name.to_string(),
    };
    let grade = |school_id: i64, id: i64| Grade {
        id,
        school_id,
        name: format!("Grade {id}"),
    };
    let class = |school_id: i64, grade_id: i64, id: &str, name: &str| ClassRoom {
        id: id.to_string(),
        school_id,
        grade_id,
        name: name.to_string(),
    };
    let equipment = |name: &str, quantity: i64| Equipment {
        name: name.to_string(),
        quantity,
    };

    store.add_school(school(1, "Lincoln HS"));
    store.add_school(school(2, "Roosevelt MS"));

    for (school_id, grade_id) in [(1, 9), (1, 10), (2, 7), (2, 8)] {
        store.add_grade(grade(school_id, grade_id));
    }

    store.add_class(class(1, 9, "A", "9-A"));
    store.add_class(class(1, 9, "B", "9-B"));
    store.add_class(class(1, 10, "A", "10-A"));
    store.add_class(class(2, 7, "C", "7-C"));

    store.set_equipment(1, 9, "A", vec![equipment("Calculator", 30)]);
    store.set_equipment(
        1,
        9,
        "B",
        vec![equipment("Microscope", 12), equipment("Globe", 2)],
    );
    store.set_equipment(1, 10, "A", vec![equipment("Laptop", 25)]);
}

/// 随机目录配置
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub schools: usize,
    pub grades_per_school: Range<usize>,
    pub classes_per_grade: Range<usize>,
    pub equipment_per_class: Range<usize>,
    /// 为 None 时使用系统随机源
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schools: 10,
            grades_per_school: 1..7,
            classes_per_grade: 1..5,
            equipment_per_class: 0..6,
            seed: None,
        }
    }
}

/// 随机目录生成器
pub struct CatalogGenerator {
    config: GeneratorConfig,
}

impl CatalogGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self) -> CatalogSnapshot {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut snapshot = CatalogSnapshot::default();

        for school_id in 1..=self.config.schools as i64 {
            let city: String = CityName().fake_with_rng(&mut rng);
            snapshot.schools.push(School {
                id: school_id,
                name: format!("{city} School #{school_id}"),
            });

            // 年级编号连续，起点随机
            let grade_count = sample_count(&mut rng, &self.config.grades_per_school) as i64;
            let first_grade = rng.random_range(1..=6);
            for grade_id in first_grade..first_grade + grade_count {
                snapshot.grades.push(Grade {
                    id: grade_id,
                    school_id,
                    name: format!("Grade {grade_id}"),
                });

                let class_count = sample_count(&mut rng, &self.config.classes_per_grade);
                for letter in ('A'..='Z').take(class_count) {
                    let class_id = letter.to_string();
                    snapshot.classes.push(ClassRoom {
                        id: class_id.clone(),
                        school_id,
                        grade_id,
                        name: format!("{grade_id}-{letter}"),
                    });

                    let item_count = sample_count(&mut rng, &self.config.equipment_per_class)
                        .min(EQUIPMENT_NAMES.len());
                    let mut names = EQUIPMENT_NAMES.to_vec();
                    let items = (0..item_count)
                        .map(|_| {
                            let name = names.swap_remove(rng.random_range(0..names.len()));
                            Equipment {
                                name: name.to_string(),
                                quantity: rng.random_range(1..=50),
                            }
                        })
                        .collect();
                    snapshot
                        .equipment
                        .push((school_id, grade_id, class_id, items));
                }
            }
        }

        snapshot
    }

    /// 生成并写入存储
    pub fn populate(&self, store: &CatalogStore) -> CatalogSnapshot {
        let snapshot = self.generate();
        store.load(snapshot.clone());
        snapshot
    }
}

/// 空区间视为 0
fn sample_count(rng: &mut StdRng, range: &Range<usize>) -> usize {
    if range.is_empty() {
        range.start
    } else {
        rng.random_range(range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_contents() {
        let store = CatalogStore::new();
        seed_catalog(&store);

        let schools: Vec<_> = store.schools().into_iter().map(|s| s.name).collect();
        assert_eq!(schools, ["Lincoln HS", "Roosevelt MS"]);
        assert_eq!(store.grades(1).len(), 2);
        assert_eq!(store.classes(1, 9).len(), 2);
        assert_eq!(store.equipment(1, 9, "B").len(), 2);
        assert!(store.equipment(2, 7, "C").is_empty());
    }

    #[test]
    fn test_generator_respects_config() {
        let generator = CatalogGenerator::new(GeneratorConfig {
            schools: 5,
            grades_per_school: 2..4,
            classes_per_grade: 1..3,
            equipment_per_class: 1..4,
            seed: Some(7),
        });
        let snapshot = generator.generate();

        assert_eq!(snapshot.schools.len(), 5);
        for school in &snapshot.schools {
            let grades = snapshot
                .grades
                .iter()
                .filter(|g| g.school_id == school.id)
                .count();
            assert!((2..4).contains(&grades));
        }
        assert_eq!(snapshot.classes.len(), snapshot.equipment.len());
        for (_, _, _, items) in &snapshot.equipment {
            assert!((1..4).contains(&items.len()));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = GeneratorConfig {
            seed: Some(42),
            ..GeneratorConfig::default()
        };
        let first = CatalogGenerator::new(config.clone()).generate();
        let second = CatalogGenerator::new(config).generate();
        assert_eq!(first, second);
    }

    #[test]
    fn test_populate_writes_store() {
        let store = CatalogStore::new();
        let snapshot = CatalogGenerator::new(GeneratorConfig {
            schools: 3,
            seed: Some(1),
            ..GeneratorConfig::default()
        })
        .populate(&store);

        assert_eq!(store.schools().len(), 3);
        assert_eq!(store.snapshot(), snapshot);
    }
}
