//! Interactive shell for rollbook.
//!
//! A numbered-menu loop over generic reader/writer handles. The shell owns
//! no state of its own: it adapts console-style input and output to the
//! pure [`RecordStore`] operations, so the whole loop is testable with
//! in-memory buffers. Persistence stays with the caller, which saves the
//! store after [`Shell::run`] returns.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::record::{Marks, RecordUpdate, StudentRecord, SUBJECT_COUNT};
use crate::store::RecordStore;

/// Interactive menu loop over a record store.
///
/// Reads menu choices and field values from `input` and writes prompts and
/// results to `output`. Invalid numeric input re-prompts; end of input ends
/// the loop the same way the save-and-exit choice does.
#[derive(Debug)]
pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell over the given input and output handles.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the menu loop until the user picks "save and exit" or the input
    /// ends. The store reflects every completed operation when this
    /// returns; saving it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self, store: &mut RecordStore) -> Result<()> {
        loop {
            self.show_menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            let Ok(choice) = line.trim().parse::<u32>() else {
                writeln!(self.output, "\nPlease enter a valid number!")?;
                continue;
            };
            match choice {
                1 => self.add_student(store)?,
                2 => self.list_students(store)?,
                3 => self.search_student(store)?,
                4 => self.update_student(store)?,
                5 => self.delete_student(store)?,
                6 => break,
                _ => writeln!(self.output, "\nInvalid choice! Please pick 1-6.")?,
            }
        }
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- What would you like to do? ---")?;
        writeln!(self.output, "1. Add a new student")?;
        writeln!(self.output, "2. Show all students")?;
        writeln!(self.output, "3. Search for a student")?;
        writeln!(self.output, "4. Update student details")?;
        writeln!(self.output, "5. Delete a student")?;
        writeln!(self.output, "6. Save and exit")?;
        write!(self.output, "\nYour choice: ")?;
        self.output.flush()?;
        Ok(())
    }

    fn add_student(&mut self, store: &mut RecordStore) -> Result<()> {
        if store.len() >= store.capacity() {
            writeln!(
                self.output,
                "\nSorry, the store is full! Can't add more students."
            )?;
            return Ok(());
        }

        writeln!(self.output, "\n--- Adding New Student ---")?;
        let Some(roll) = self.prompt_number("Enter roll number: ")? else {
            return Ok(());
        };
        if store.contains_roll(roll) {
            writeln!(
                self.output,
                "This roll number already exists! Please use a different one."
            )?;
            return Ok(());
        }

        let Some(name) = self.prompt_text("Enter student name: ")? else {
            return Ok(());
        };
        let Some(age) = self.prompt_number("Enter age: ")? else {
            return Ok(());
        };
        let Some(department) = self.prompt_text("Enter department: ")? else {
            return Ok(());
        };
        let Some(marks) = self.prompt_marks()? else {
            return Ok(());
        };

        // Marks were range-checked at the prompt, so construction and add
        // can only fail on a roll collision, which was checked above.
        match StudentRecord::new(roll, name, age, department, marks) {
            Ok(record) => {
                let percentage = record.percentage();
                let grade = record.grade();
                match store.add(record) {
                    Ok(()) => {
                        writeln!(self.output, "\nGreat! Student added successfully.")?;
                        writeln!(self.output, "Percentage: {percentage:.2}%")?;
                        writeln!(self.output, "Grade: {grade}")?;
                    }
                    Err(err) => writeln!(self.output, "\n{err}")?,
                }
            }
            Err(err) => writeln!(self.output, "\n{err}")?,
        }
        Ok(())
    }

    fn list_students(&mut self, store: &RecordStore) -> Result<()> {
        if store.is_empty() {
            writeln!(self.output, "\nNo students in the store yet.")?;
            return Ok(());
        }

        writeln!(self.output, "\n========================================")?;
        writeln!(self.output, "All Students")?;
        writeln!(self.output, "========================================")?;
        writeln!(
            self.output,
            "{:<8} {:<20} {:<5} {:<15} {:<10} {}",
            "Roll", "Name", "Age", "Department", "Percentage", "Grade"
        )?;
        writeln!(self.output, "----------------------------------------")?;
        for record in store.records() {
            writeln!(
                self.output,
                "{:<8} {:<20} {:<5} {:<15} {:<10.2} {}",
                record.roll,
                record.name(),
                record.age,
                record.department(),
                record.percentage(),
                record.grade()
            )?;
        }
        writeln!(self.output, "----------------------------------------")?;
        writeln!(self.output, "Total: {} students", store.len())?;
        Ok(())
    }

    fn search_student(&mut self, store: &RecordStore) -> Result<()> {
        if store.is_empty() {
            writeln!(self.output, "\nNo students to search.")?;
            return Ok(());
        }

        writeln!(self.output, "\n--- Search Student ---")?;
        let Some(roll) = self.prompt_number("Enter roll number: ")? else {
            return Ok(());
        };

        if let Some(record) = store.find_by_roll(roll) {
            writeln!(self.output, "\nStudent Found!")?;
            writeln!(self.output, "----------------------------------------")?;
            writeln!(self.output, "Roll Number: {}", record.roll)?;
            writeln!(self.output, "Name: {}", record.name())?;
            writeln!(self.output, "Age: {}", record.age)?;
            writeln!(self.output, "Department: {}", record.department())?;
            writeln!(self.output, "\nMarks:")?;
            for (i, mark) in record.marks().iter().enumerate() {
                writeln!(self.output, "  Subject {}: {mark:.2}", i + 1)?;
            }
            writeln!(self.output, "\nPercentage: {:.2}%", record.percentage())?;
            writeln!(self.output, "Grade: {}", record.grade())?;
            writeln!(self.output, "----------------------------------------")?;
        } else {
            writeln!(self.output, "No student found with roll number {roll}.")?;
        }
        Ok(())
    }

    fn update_student(&mut self, store: &mut RecordStore) -> Result<()> {
        if store.is_empty() {
            writeln!(self.output, "\nNo students to update.")?;
            return Ok(());
        }

        writeln!(self.output, "\n--- Update Student ---")?;
        let Some(roll) = self.prompt_number("Enter roll number of student to update: ")?
        else {
            return Ok(());
        };

        let Some(current) = store.find_by_roll(roll) else {
            writeln!(self.output, "Student with roll number {roll} not found.")?;
            return Ok(());
        };
        writeln!(self.output, "\nCurrent details of {}:", current.name())?;
        writeln!(
            self.output,
            "Age: {}, Department: {}",
            current.age,
            current.department()
        )?;

        writeln!(self.output, "\n--- Enter new details ---")?;
        let Some(name) = self.prompt_text("New name: ")? else {
            return Ok(());
        };
        let Some(age) = self.prompt_number("New age: ")? else {
            return Ok(());
        };
        let Some(department) = self.prompt_text("New department: ")? else {
            return Ok(());
        };
        let Some(marks) = self.prompt_marks()? else {
            return Ok(());
        };

        match store.update_by_roll(
            roll,
            RecordUpdate {
                name,
                age,
                department,
                marks,
            },
        ) {
            Ok(()) => {
                writeln!(self.output, "\nStudent record updated successfully!")?;
                if let Some(record) = store.find_by_roll(roll) {
                    writeln!(self.output, "New percentage: {:.2}%", record.percentage())?;
                    writeln!(self.output, "New grade: {}", record.grade())?;
                }
            }
            Err(err) => writeln!(self.output, "\n{err}")?,
        }
        Ok(())
    }

    fn delete_student(&mut self, store: &mut RecordStore) -> Result<()> {
        if store.is_empty() {
            writeln!(self.output, "\nNo students to delete.")?;
            return Ok(());
        }

        writeln!(self.output, "\n--- Delete Student ---")?;
        let Some(roll) = self.prompt_number("Enter roll number: ")? else {
            return Ok(());
        };

        let Some(record) = store.find_by_roll(roll) else {
            writeln!(self.output, "Student with roll number {roll} not found.")?;
            return Ok(());
        };
        let name = record.name().to_string();

        write!(
            self.output,
            "\nAre you sure you want to delete {name}? (y/n): "
        )?;
        self.output.flush()?;
        let Some(confirm) = self.read_line()? else {
            return Ok(());
        };

        if matches!(confirm.trim(), "y" | "Y") {
            match store.delete_by_roll(roll) {
                Ok(()) => writeln!(self.output, "Student deleted successfully.")?,
                Err(err) => writeln!(self.output, "{err}")?,
            }
        } else {
            writeln!(self.output, "Deletion cancelled.")?;
        }
        Ok(())
    }

    /// Prompt until a whole number is entered. `None` means end of input.
    fn prompt_number(&mut self, prompt: &str) -> Result<Option<u32>> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Ok(value) = line.trim().parse::<u32>() {
                return Ok(Some(value));
            }
            writeln!(self.output, "Please enter a valid number!")?;
        }
    }

    /// Prompt for a free-text line. `None` means end of input.
    fn prompt_text(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|line| line.trim_end().to_string()))
    }

    /// Prompt for all subject marks, re-prompting any value that is not a
    /// number in `[0, 100]`. `None` means end of input.
    fn prompt_marks(&mut self) -> Result<Option<Marks>> {
        writeln!(self.output, "\nEnter marks for {SUBJECT_COUNT} subjects (0-100):")?;
        let mut marks: Marks = [0.0; SUBJECT_COUNT];
        for (i, mark) in marks.iter_mut().enumerate() {
            loop {
                write!(self.output, "Subject {} marks: ", i + 1)?;
                self.output.flush()?;
                let Some(line) = self.read_line()? else {
                    return Ok(None);
                };
                match line.trim().parse::<f32>() {
                    Ok(value) if (0.0..=100.0).contains(&value) => {
                        *mark = value;
                        break;
                    }
                    _ => writeln!(
                        self.output,
                        "Invalid marks! Please enter between 0 and 100."
                    )?,
                }
            }
        }
        Ok(Some(marks))
    }

    /// Read one line of input. `None` means end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}
