use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::error::{AppError, Res};

/// Number of rows returned per page by list endpoints.
pub const PAGE_SIZE: i64 = 10;

pub struct Success;
impl Success {
    pub fn created<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Created().json(body))
    }
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(body))
    }
    pub fn no_content() -> Res<impl Responder> {
        Result::Ok(HttpResponse::NoContent().finish())
    }
}

/// `?page=N` query accepted by every list endpoint. Pages start at 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page().max(1) - 1) * PAGE_SIZE
    }

    /// Rejects page numbers below 1.
    pub fn validate(&self) -> Res<()> {
        if self.page() < 1 {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }
        Ok(())
    }
}

/// A page of results with neighbour page numbers.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Builds a page from the total row count and the rows of the requested page.
    /// Asking past the last page is a 404, except for page 1 of an empty set.
    pub fn new(query: PageQuery, count: i64, results: Vec<T>) -> Res<Self> {
        query.validate()?;
        let page = query.page();
        let last_page = ((count + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        if page > last_page {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }
        Ok(Page {
            count,
            next: (page < last_page).then_some(page + 1),
            previous: (page > 1).then_some(page - 1),
            results,
        })
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
