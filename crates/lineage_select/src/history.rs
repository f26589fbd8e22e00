//! Undo/redo history with transaction support.
//!
//! Commands are executed through the history so each one can be undone.
//! Several commands can be grouped into a transaction, which undoes as a
//! single step (for example holding "select down" until the bottom).

use lineage_scene::SceneGraph;

use crate::command::{Command, CommandResult};

/// A group of commands executed as a single undoable unit.
pub struct Transaction<S: SceneGraph> {
    pub name: String,
    pub commands: Vec<Box<dyn Command<S>>>,
}

impl<S: SceneGraph> Transaction<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<S: SceneGraph> Command<S> for Transaction<S> {
    fn description(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, scene: &mut S) -> CommandResult {
        for cmd in &mut self.commands {
            cmd.execute(scene)?;
        }
        Ok(())
    }

    fn undo(&mut self, scene: &mut S) -> CommandResult {
        for cmd in self.commands.iter_mut().rev() {
            cmd.undo(scene)?;
        }
        Ok(())
    }
}

/// Undo/redo history stack.
pub struct UndoHistory<S: SceneGraph> {
    undo_stack: Vec<Box<dyn Command<S>>>,
    redo_stack: Vec<Box<dyn Command<S>>>,
    max_size: usize,
    current_transaction: Option<Transaction<S>>,
}

impl<S: SceneGraph + 'static> Default for UndoHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneGraph + 'static> UndoHistory<S> {
    /// Default maximum history size.
    pub const DEFAULT_MAX_SIZE: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
            current_transaction: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|c| c.description())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Begin a new transaction.
    pub fn begin_transaction(&mut self, name: impl Into<String>) {
        if self.current_transaction.is_some() {
            log::warn!("Beginning transaction while one is already open");
            self.commit_transaction();
        }
        self.current_transaction = Some(Transaction::new(name));
    }

    /// Commit the current transaction as one undo step.
    pub fn commit_transaction(&mut self) {
        if let Some(transaction) = self.current_transaction.take() {
            if !transaction.is_empty() {
                self.push_command(Box::new(transaction));
            }
        }
    }

    /// Abandon the current transaction, undoing what it already did.
    pub fn rollback_transaction(&mut self, scene: &mut S) -> CommandResult {
        match self.current_transaction.take() {
            Some(mut transaction) => transaction.undo(scene),
            None => Ok(()),
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.current_transaction.is_some()
    }

    /// Execute a command and record it.
    ///
    /// Failed commands are not recorded.
    pub fn execute(&mut self, mut cmd: Box<dyn Command<S>>, scene: &mut S) -> CommandResult {
        cmd.execute(scene)?;
        self.push(cmd);
        Ok(())
    }

    /// Record a command that has already been executed.
    pub fn push(&mut self, cmd: Box<dyn Command<S>>) {
        if let Some(transaction) = &mut self.current_transaction {
            transaction.commands.push(cmd);
        } else {
            self.push_command(cmd);
        }
    }

    fn push_command(&mut self, cmd: Box<dyn Command<S>>) {
        self.undo_stack.push(cmd);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last command. Returns false if there was nothing to undo.
    pub fn undo(&mut self, scene: &mut S) -> Result<bool, lineage_core::Error> {
        let Some(mut cmd) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = cmd.undo(scene) {
            self.undo_stack.push(cmd);
            return Err(e);
        }
        self.redo_stack.push(cmd);
        Ok(true)
    }

    /// Redo the last undone command. Returns false if there was nothing to redo.
    pub fn redo(&mut self, scene: &mut S) -> Result<bool, lineage_core::Error> {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = cmd.execute(scene) {
            self.redo_stack.push(cmd);
            return Err(e);
        }
        self.undo_stack.push(cmd);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_transaction = None;
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}
