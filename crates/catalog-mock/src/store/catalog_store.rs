//! 目录存储
//!
//! 查询时必须给出完整的祖先 id；祖先与记录不一致时返回空列表而不是更宽的结果。

use serde::{Deserialize, Serialize};

use super::MemoryStore;
use crate::models::{ClassRoom, Equipment, Grade, School};

/// 目录全量数据，用于导出与导入
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub schools: Vec<School>,
    pub grades: Vec<Grade>,
    pub classes: Vec<ClassRoom>,
    /// (school_id, grade_id, class_id, 器材清单)
    pub equipment: Vec<(i64, i64, String, Vec<Equipment>)>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    schools: MemoryStore<School>,
    grades: MemoryStore<Grade>,
    classes: MemoryStore<ClassRoom>,
    equipment: MemoryStore<Vec<Equipment>>,
}

fn grade_key(school_id: i64, grade_id: i64) -> String {
    format!("{school_id}/{grade_id}")
}

fn class_key(school_id: i64, grade_id: i64, class_id: &str) -> String {
    format!("{school_id}/{grade_id}/{class_id}")
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_school(&self, school: School) {
        self.schools.insert(school.id.to_string(), school);
    }

    pub fn add_grade(&self, grade: Grade) {
        self.grades.insert(grade_key(grade.school_id, grade.id), grade);
    }

    pub fn add_class(&self, class: ClassRoom) {
        self.classes
            .insert(class_key(class.school_id, class.grade_id, &class.id), class);
    }

    pub fn set_equipment(&self, school_id: i64, grade_id: i64, class_id: &str, items: Vec<Equipment>) {
        self.equipment
            .insert(class_key(school_id, grade_id, class_id), items);
    }

    pub fn schools(&self) -> Vec<School> {
        self.schools.list_sorted_by(|_| true, |s| s.id)
    }

    pub fn grades(&self, school_id: i64) -> Vec<Grade> {
        self.grades
            .list_sorted_by(|g| g.school_id == school_id, |g| g.id)
    }

    pub fn classes(&self, school_id: i64, grade_id: i64) -> Vec<ClassRoom> {
        self.classes.list_sorted_by(
            |c| c.school_id == school_id && c.grade_id == grade_id,
            |c| c.id.clone(),
        )
    }

    pub fn equipment(&self, school_id: i64, grade_id: i64, class_id: &str) -> Vec<Equipment> {
        self.equipment
            .get(&class_key(school_id, grade_id, class_id))
            .unwrap_or_default()
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.schools.count(),
            self.grades.count(),
            self.classes.count(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.schools.count() == 0
    }

    pub fn clear(&self) {
        self.schools.clear();
        self.grades.clear();
        self.classes.clear();
        self.equipment.clear();
    }

    /// 导出全量数据（有序）
    pub fn snapshot(&self) -> CatalogSnapshot {
        let classes = self.classes.list_sorted_by(
            |_| true,
            |c| (c.school_id, c.grade_id, c.id.clone()),
        );
        let equipment = classes
            .iter()
            .map(|c| {
                (
                    c.school_id,
                    c.grade_id,
                    c.id.clone(),
                    self.equipment(c.school_id, c.grade_id, &c.id),
                )
            })
            .collect();

        CatalogSnapshot {
            schools: self.schools(),
            grades: self
                .grades
                .list_sorted_by(|_| true, |g| (g.school_id, g.id)),
            classes,
            equipment,
        }
    }

    /// 导入全量数据，追加到现有内容
    pub fn load(&self, snapshot: CatalogSnapshot) {
        for school in snapshot.schools {
            self.add_school(school);
        }
        for grade in snapshot.grades {
            self.add_grade(grade);
        }
        for class in snapshot.classes {
            self.add_class(class);
        }
        for (school_id, grade_id, class_id, items) in snapshot.equipment {
            self.set_equipment(school_id, grade_id, &class_id, items);
        }
    }
}
