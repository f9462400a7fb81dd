//! Secondary-index "speed table": rows held in a slot arena, with one
//! skip list per indexed column and the row's stable id stored as the
//! value in each of them.
//!
//! The schema here is the one a table generator would emit for:
//!
//! ```text
//! TABLE people (
//!     name       TEXT    INDEXED,
//!     age        INTEGER INDEXED,
//!     school     TEXT,             -- unindexed
//!     student_id TEXT    UNIQUE
//! )
//! ```
//!
//! Field updates go through explicit setters that detach the row from
//! the index under the old key and reattach it under the new one, as a
//! single orderable step. There is no cross-index atomicity: each index
//! is updated by its own skip list operation.

use crate::error::SkipListError;
use crate::skiplist::SkipList;

/// Stable handle to a table row. This is what every index stores, so
/// row identity comparisons are id comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowId(u32);

impl RowId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Row {
    name: String,
    age: i64,
    school: Option<String>,
    student_id: Option<String>,
}

/// A table of people rows, indexed by name, by age, and uniquely by
/// student id.
///
/// Reads return `None` for a row that has been deleted; the mutating
/// methods panic on a stale [`RowId`], since holding one past deletion
/// is a caller bug.
pub struct Table {
    rows: Vec<Option<Row>>,
    free: Vec<RowId>,
    name_index: SkipList<String, RowId>,
    age_index: SkipList<i64, RowId>,
    student_id_index: SkipList<String, RowId>,
}

impl Table {
    pub fn new(max_level: usize) -> Table {
        Table {
            rows: Vec::new(),
            free: Vec::new(),
            name_index: SkipList::new(max_level),
            age_index: SkipList::new(max_level),
            student_id_index: SkipList::new_unique(max_level),
        }
    }

    /// Number of live rows.
    pub fn len(&self) -> usize {
        self.rows.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a row and threads it into the name and age indexes. The
    /// student id starts unset; see [`set_student_id`].
    ///
    /// [`set_student_id`]: Table::set_student_id
    pub fn insert(&mut self, name: &str, age: i64, school: Option<&str>) -> RowId {
        let row = Row {
            name: name.to_owned(),
            age,
            school: school.map(str::to_owned),
            student_id: None,
        };

        let id = match self.free.pop() {
            Some(id) => {
                debug_assert!(self.rows[id.index()].is_none());
                self.rows[id.index()] = Some(row);
                id
            }
            None => {
                let id = RowId(self.rows.len() as u32);
                self.rows.push(Some(row));
                id
            }
        };

        self.name_index
            .insert(name.to_owned(), id)
            .expect("name index is not unique");
        self.age_index
            .insert(age, id)
            .expect("age index is not unique");
        id
    }

    /// Detaches the row from every index it participates in and frees
    /// its slot. Returns `false` for an id that is no longer live.
    pub fn delete(&mut self, row: RowId) -> bool {
        let data = match self.rows.get_mut(row.index()).and_then(Option::take) {
            Some(data) => data,
            None => return false,
        };

        self.name_index.delete(&data.name, &row);
        self.age_index.delete(&data.age, &row);
        if let Some(student_id) = &data.student_id {
            self.student_id_index.delete(student_id, &row);
        }

        self.free.push(row);
        true
    }

    pub fn name(&self, row: RowId) -> Option<&str> {
        self.row(row).map(|data| data.name.as_str())
    }

    pub fn age(&self, row: RowId) -> Option<i64> {
        self.row(row).map(|data| data.age)
    }

    pub fn school(&self, row: RowId) -> Option<&str> {
        self.row(row).and_then(|data| data.school.as_deref())
    }

    pub fn student_id(&self, row: RowId) -> Option<&str> {
        self.row(row).and_then(|data| data.student_id.as_deref())
    }

    /// Reindexes the row under a new name.
    pub fn set_name(&mut self, row: RowId, name: &str) {
        let data = self.rows[row.index()].as_mut().expect("stale row id");
        if data.name == name {
            return;
        }

        self.name_index.delete(&data.name, &row);
        data.name = name.to_owned();
        self.name_index
            .insert(name.to_owned(), row)
            .expect("name index is not unique");
    }

    /// Reindexes the row under a new age.
    pub fn set_age(&mut self, row: RowId, age: i64) {
        let data = self.rows[row.index()].as_mut().expect("stale row id");
        if data.age == age {
            return;
        }

        self.age_index.delete(&data.age, &row);
        data.age = age;
        self.age_index
            .insert(age, row)
            .expect("age index is not unique");
    }

    /// Stores the school; it is unindexed, so nothing is rethreaded.
    pub fn set_school(&mut self, row: RowId, school: Option<&str>) {
        let data = self.rows[row.index()].as_mut().expect("stale row id");
        data.school = school.map(str::to_owned);
    }

    /// Moves the row to a new student id, or detaches it with `None`.
    ///
    /// The student id index is unique: if another row already holds
    /// `student_id`, the call fails and this row keeps its current id.
    pub fn set_student_id(
        &mut self,
        row: RowId,
        student_id: Option<&str>,
    ) -> Result<(), SkipListError<String>> {
        let data = self.rows[row.index()].as_mut().expect("stale row id");
        self.student_id_index
            .replace(student_id.map(str::to_owned), &mut data.student_id, row)
    }

    /// Read-only handle to the name index, for searches and queries.
    pub fn by_name(&self) -> &SkipList<String, RowId> {
        &self.name_index
    }

    /// Read-only handle to the age index.
    pub fn by_age(&self) -> &SkipList<i64, RowId> {
        &self.age_index
    }

    /// Read-only handle to the unique student id index.
    pub fn by_student_id(&self) -> &SkipList<String, RowId> {
        &self.student_id_index
    }

    fn row(&self, row: RowId) -> Option<&Row> {
        self.rows.get(row.index()).and_then(Option::as_ref)
    }
}
