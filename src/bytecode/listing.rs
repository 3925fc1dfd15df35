/*!
  A program listing is a sequence of base-10 signed integers separated by commas, semicolons, or
  whitespace. There is no header and no metadata; the first integer lands at address 0.
*/

use nom::{
  branch::alt,
  character::complete::{
    digit1,
    multispace0,
    multispace1,
    one_of
  },
  combinator::{all_consuming, map, map_res, opt, recognize},
  error::ErrorKind,
  multi::separated_list,
  sequence::{delimited, pair},
  IResult
};

use crate::error::{Error, Result};
use crate::value::Value;

type ListingResult<'a, T> = IResult<&'a str, T, (&'a str, ErrorKind)>;

fn integer_p(text: &str) -> ListingResult<'_, Value> {
  map_res(
    recognize(pair(opt(one_of("+-")), digit1)),
    |out: &str| out.parse::<Value>()
  )(text)
}

fn delimiter_p(text: &str) -> ListingResult<'_, char> {
  alt((
    delimited(multispace0, one_of(",;"), multispace0),
    map(multispace1, |_| ' ')
  ))(text)
}

fn listing_p(text: &str) -> ListingResult<'_, Vec<Value>> {
  all_consuming(
    delimited(
      multispace0,
      separated_list(delimiter_p, integer_p),
      pair(opt(one_of(",;")), multispace0)
    )
  )(text)
}

/// Parses a listing into the integers it contains, in order.
pub fn parse_listing(text: &str) -> Result<Vec<Value>> {
  match listing_p(text) {
    Ok((_rest, cells)) => Ok(cells),

    Err(nom::Err::Error((rest, kind))) | Err(nom::Err::Failure((rest, kind))) => {
      Err(Error::Parse {
        offset  : text.len() - rest.len(),
        message : format!("{:?} while reading {:?}", kind, rest.chars().take(16).collect::<String>())
      })
    }

    Err(nom::Err::Incomplete(_)) => {
      Err(Error::Parse { offset: text.len(), message: "unexpected end of listing".to_string() })
    }
  }
}
