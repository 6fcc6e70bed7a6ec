// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned text tables.
//!
//! Widths are measured on the plain cell text and color is applied after
//! padding, so escape codes never skew alignment.

use std::io::Write;

use crate::color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Muted,
    /// Colored by the run status the cell names
    Status,
}

pub struct Column {
    title: &'static str,
    style: Style,
    max: Option<usize>,
}

impl Column {
    pub fn left(title: &'static str) -> Self {
        Self { title, style: Style::Plain, max: None }
    }

    pub fn muted(title: &'static str) -> Self {
        Self { title, style: Style::Muted, max: None }
    }

    pub fn status(title: &'static str) -> Self {
        Self { title, style: Style::Status, max: None }
    }

    /// Truncate cells longer than `max` characters.
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    fn fit(&self, cell: &str) -> String {
        match self.max {
            Some(max) if cell.chars().count() > max => cell.chars().take(max).collect(),
            _ => cell.to_string(),
        }
    }

    fn paint(&self, cell: &str) -> String {
        match self.style {
            Style::Plain => cell.to_string(),
            Style::Muted => color::muted(cell),
            Style::Status => color::status(cell.trim_end()) + &cell[cell.trim_end().len()..],
        }
    }
}

pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Add a row. Missing trailing cells render empty.
    pub fn row(&mut self, cells: Vec<String>) {
        let cells = self.columns.iter().zip(cells.iter()).map(|(col, cell)| col.fit(cell)).collect();
        self.rows.push(cells);
    }

    pub fn render(&self, out: &mut (impl Write + ?Sized)) {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(col.title.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, width)| color::header(&pad(col.title, *width)))
            .collect();
        let _ = writeln!(out, "{}", header.join("  ").trim_end());

        for row in &self.rows {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (col, width))| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    col.paint(&pad(cell, *width))
                })
                .collect();
            let _ = writeln!(out, "{}", cells.join("  ").trim_end());
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
