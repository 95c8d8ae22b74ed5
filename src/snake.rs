use std::collections::VecDeque;

use crate::{offset, Coords, Vector};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn vector(self) -> Vector {
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub fn from_vector(vector: Vector) -> Option<Direction> {
        match vector {
            (-1, 0) => Some(Up),
            (1, 0) => Some(Down),
            (0, -1) => Some(Left),
            (0, 1) => Some(Right),
            _ => None,
        }
    }
}

/// Snake body, tail at the front and head at the back.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    vector: Vector,
    target_size: usize,
}

impl Snake {
    /// Lays out `size` cells in a straight line through `center`, heading in `direction`.
    pub fn new(center: Coords, size: usize, direction: Direction) -> Self {
        let (dy, dx) = direction.vector();
        let head_lead = (size / 2) as i32;

        let body = (0..size as i32).rev()
            .map(|i| (center.0 + dy * (head_lead - i), center.1 + dx * (head_lead - i)))
            .collect();
        Snake { body, vector: (dy, dx), target_size: size }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body.back().copied().unwrap_or_default()
    }

    pub fn tail(&self) -> Coords {
        self.body.front().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    pub fn vector(&self) -> Vector {
        self.vector
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    /// Where the head lands on the next advance.
    pub fn next_head(&self) -> Coords {
        offset(self.head(), self.vector)
    }

    /// Adopts `new_direction` unless it is a 180 degree turn. Returns whether it was taken.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        let (dy, dx) = new_direction.vector();
        let (sdy, sdx) = self.vector;

        if dy == -sdy && dx == -sdx {
            return false;
        }

        self.vector = (dy, dx);
        true
    }

    pub fn grow(&mut self, amount: usize) {
        self.target_size += amount;
    }

    /// Pushes a new head and drops the tail while longer than the target size.
    /// Only one cell is appended per call, so growth is capped at one per tick.
    pub fn advance(&mut self, new_head: Coords) -> Option<Coords> {
        self.body.push_back(new_head);

        if self.body.len() > self.target_size {
            self.body.pop_front()
        } else {
            None
        }
    }

    pub fn head_char(&self) -> char {
        match Direction::from_vector(self.vector) {
            Some(Up) => '^',
            Some(Down) => 'v',
            Some(Left) => '<',
            Some(Right) => '>',
            None => '@',
        }
    }
}
