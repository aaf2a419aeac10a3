/*! An engine needs to find and read files, using simple file names relative to a working directory.

    This module provides the [`FileSystem`] and [`File`] traits with two implementations:
    [`PhysicalFileSystem`] reads from disk; [`VirtualFileSystem`] overlays in-memory files on top
    of the disk, without ever modifying it.
*/

use std::io::{BufRead, BufReader};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use path_dedot::ParseDot;
use crate::tex::characters::{Character, StringLineSource, TextLine, TextLineSource, trim_line};
use crate::utils::errors::{ErrorKind, TeXError, TeXResult};
use crate::utils::{HMap, Ptr};

/// A file that may or may not exist.
pub trait File:Clone+std::fmt::Debug {
    type Char:Character;
    fn path(&self) -> &Path;
    fn exists(&self) -> bool;
    /// Opens the file for reading line by line; the file is closed when the result is dropped.
    fn lines(&self) -> TeXResult<FileLines<Self::Char>>;
    /// The full contents of the file.
    fn read_bytes(&self) -> TeXResult<Vec<u8>>;
    /// The file name without directory and extension, e.g. for `\jobname`.
    fn stem(&self) -> String {
        self.path().file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default()
    }
}

/// Finds [`File`]s relative to a working directory.
pub trait FileSystem:Clone {
    type File:File;
    fn new(pwd:PathBuf) -> Self;
    /// The file at `path` (relative to the working directory), which need not exist.
    fn get<S:AsRef<str>>(&mut self,path:S) -> Self::File;
    fn pwd(&self) -> &Path;
    /// Changes the working directory, returning the old one.
    fn set_pwd(&mut self,pwd:PathBuf) -> PathBuf;
    /// Resolves the argument of `\input`: `name.tex` if it exists and `name` has no extension,
    /// `name` otherwise.
    fn find_input(&mut self,name:&str) -> Option<Self::File> {
        if Path::new(name).extension().is_none() {
            let f = self.get(format!("{}.tex",name));
            if f.exists() { return Some(f) }
        }
        let f = self.get(name);
        if f.exists() { Some(f) } else { None }
    }
}

fn resolve(pwd:&Path,path:&str) -> PathBuf {
    let p = Path::new(path);
    let p = if p.is_absolute() { p.to_path_buf() } else { pwd.join(p) };
    match p.parse_dot() {
        Ok(c) => c.to_path_buf(),
        Err(_) => p
    }
}

/// The lines of an opened [`File`].
pub enum FileLines<C:Character> {
    /// Read lazily from disk.
    Disk(BufReader<std::fs::File>,PhantomData<C>),
    Memory(StringLineSource<C>)
}
impl<C:Character> TextLineSource<C> for FileLines<C> {
    fn get_line(&mut self) -> Option<TextLine<C>> {
        match self {
            FileLines::Memory(s) => s.get_line(),
            FileLines::Disk(r,_) => {
                let mut buf = Vec::new();
                match r.read_until(b'\n',&mut buf) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => {
                        if buf.last() == Some(&b'\n') { buf.pop(); }
                        Some(C::convert(trim_line(buf)))
                    }
                }
            }
        }
    }
}

/// A file on disk.
#[derive(Clone,Debug)]
pub struct PhysicalFile<C:Character> { path:PathBuf, phantom:PhantomData<C> }
impl<C:Character> File for PhysicalFile<C> {
    type Char = C;
    fn path(&self) -> &Path { &self.path }
    fn exists(&self) -> bool { self.path.is_file() }
    fn lines(&self) -> TeXResult<FileLines<C>> {
        let f = std::fs::File::open(&self.path)
            .map_err(|_| TeXError::new(ErrorKind::FileNotFound(self.path.display().to_string())))?;
        Ok(FileLines::Disk(BufReader::new(f),PhantomData))
    }
    fn read_bytes(&self) -> TeXResult<Vec<u8>> {
        std::fs::read(&self.path)
            .map_err(|_| TeXError::new(ErrorKind::FileNotFound(self.path.display().to_string())))
    }
}

/// Reads files from disk.
#[derive(Clone,Debug)]
pub struct PhysicalFileSystem<C:Character> { pwd:PathBuf, phantom:PhantomData<C> }
impl<C:Character> FileSystem for PhysicalFileSystem<C> {
    type File = PhysicalFile<C>;
    fn new(pwd:PathBuf) -> Self { PhysicalFileSystem { pwd, phantom:PhantomData } }
    fn get<S:AsRef<str>>(&mut self, path: S) -> PhysicalFile<C> {
        PhysicalFile { path:resolve(&self.pwd,path.as_ref()), phantom:PhantomData }
    }
    fn pwd(&self) -> &Path { &self.pwd }
    fn set_pwd(&mut self, pwd: PathBuf) -> PathBuf { std::mem::replace(&mut self.pwd,pwd) }
}

/// A file that is either held in memory or read from disk.
#[derive(Clone,Debug)]
pub struct VirtualFile<C:Character> {
    path:PathBuf,
    contents:Option<Ptr<[u8]>>,
    phantom:PhantomData<C>
}
impl<C:Character> File for VirtualFile<C> {
    type Char = C;
    fn path(&self) -> &Path { &self.path }
    fn exists(&self) -> bool { self.contents.is_some() || self.path.is_file() }
    fn lines(&self) -> TeXResult<FileLines<C>> {
        match &self.contents {
            Some(c) => Ok(FileLines::Memory(crate::tex::characters::split_lines(c.iter().copied()).into())),
            None => PhysicalFile { path:self.path.clone(), phantom:PhantomData }.lines()
        }
    }
    fn read_bytes(&self) -> TeXResult<Vec<u8>> {
        match &self.contents {
            Some(c) => Ok(c.to_vec()),
            None => PhysicalFile::<C> { path:self.path.clone(), phantom:PhantomData }.read_bytes()
        }
    }
}

/// In-memory files on top of the physical file system.
#[derive(Clone,Debug)]
pub struct VirtualFileSystem<C:Character> {
    pwd:PathBuf,
    files:HMap<PathBuf,Ptr<[u8]>>,
    phantom:PhantomData<C>
}
impl<C:Character> VirtualFileSystem<C> {
    /// Adds (or replaces) an in-memory file at `path`, relative to the working directory.
    pub fn add_file<S:AsRef<str>,B:Into<Vec<u8>>>(&mut self,path:S,contents:B) {
        let path = resolve(&self.pwd,path.as_ref());
        let contents : Vec<u8> = contents.into();
        self.files.insert(path,contents.into());
    }
}
impl<C:Character> FileSystem for VirtualFileSystem<C> {
    type File = VirtualFile<C>;
    fn new(pwd:PathBuf) -> Self { VirtualFileSystem { pwd, files:HMap::default(), phantom:PhantomData } }
    fn get<S:AsRef<str>>(&mut self, path: S) -> VirtualFile<C> {
        let path = resolve(&self.pwd,path.as_ref());
        let contents = self.files.get(&path).cloned();
        VirtualFile { path, contents, phantom:PhantomData }
    }
    fn pwd(&self) -> &Path { &self.pwd }
    fn set_pwd(&mut self, pwd: PathBuf) -> PathBuf { std::mem::replace(&mut self.pwd,pwd) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_files() {
        let mut fs = VirtualFileSystem::<u8>::new(PathBuf::from("/virtual/dir"));
        fs.add_file("sub/foo.tex","line one  \nline two");
        let f = fs.find_input("sub/../sub/foo").unwrap();
        assert_eq!(f.path(),Path::new("/virtual/dir/sub/foo.tex"));
        assert_eq!(f.stem(),"foo");
        let mut lines = f.lines().unwrap();
        assert_eq!(&*lines.get_line().unwrap(),b"line one");
        assert_eq!(&*lines.get_line().unwrap(),b"line two");
        assert!(lines.get_line().is_none());
        assert!(fs.find_input("bar").is_none());
    }
}
