//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the inventory. Duplicates are allowed.
    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        let book = self.repository.books.create(&book).await?;
        tracing::info!(book_id = book.id, title = %book.title, "Book added");
        Ok(book)
    }

    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }
}
